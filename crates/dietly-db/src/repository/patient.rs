//! SurrealDB implementation of [`PatientProfileRepository`].

use chrono::{DateTime, NaiveDate, Utc};
use dietly_core::error::{DietlyError, DietlyResult};
use dietly_core::models::patient::{
    CreatePatientProfile, Gender, PatientProfile, PatientWithUser, UpdatePatientProfile,
};
use dietly_core::models::user::{CreateUser, User};
use dietly_core::repository::{PaginatedResult, PatientProfileRepository, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, write_error};

use super::user::{UserRow, UserRowWithId, hash_password};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct PatientRow {
    user_id: String,
    tenant_id: String,
    date_of_birth: String,
    gender: String,
    height_cm: f64,
    weight_kg: f64,
    initial_weight_kg: Option<f64>,
    goal_weight_kg: Option<f64>,
    activity_level: Option<String>,
    medical_conditions: Option<String>,
    dietary_preferences: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PatientRow {
    fn into_profile(self, id: Uuid) -> Result<PatientProfile, DbError> {
        Ok(PatientProfile {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            date_of_birth: parse_date(&self.date_of_birth)?,
            gender: parse_gender(&self.gender)?,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            initial_weight_kg: self.initial_weight_kg,
            goal_weight_kg: self.goal_weight_kg,
            activity_level: self.activity_level,
            medical_conditions: self.medical_conditions,
            dietary_preferences: self.dietary_preferences,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct PatientRowWithId {
    record_id: String,
    user_id: String,
    tenant_id: String,
    date_of_birth: String,
    gender: String,
    height_cm: f64,
    weight_kg: f64,
    initial_weight_kg: Option<f64>,
    goal_weight_kg: Option<f64>,
    activity_level: Option<String>,
    medical_conditions: Option<String>,
    dietary_preferences: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PatientRowWithId {
    fn try_into_profile(self) -> Result<PatientProfile, DbError> {
        let id = parse_uuid(&self.record_id, "patient_profile")?;
        Ok(PatientProfile {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            date_of_birth: parse_date(&self.date_of_birth)?,
            gender: parse_gender(&self.gender)?,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            initial_weight_kg: self.initial_weight_kg,
            goal_weight_kg: self.goal_weight_kg,
            activity_level: self.activity_level,
            medical_conditions: self.medical_conditions,
            dietary_preferences: self.dietary_preferences,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Query(format!("invalid {what} UUID: {e}")))
}

fn parse_gender(s: &str) -> Result<Gender, DbError> {
    Gender::parse(s).ok_or_else(|| DbError::Query(format!("unknown gender: {s}")))
}

/// Dates are stored as `YYYY-MM-DD` strings.
fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Query(format!("invalid date: {e}")))
}

/// SurrealDB implementation of the patient profile repository.
#[derive(Clone)]
pub struct SurrealPatientRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealPatientRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }

    /// Fetch a profile by its record id, optionally tenant-filtered.
    async fn get_profile_by_id(
        &self,
        id: Uuid,
        tenant: Option<Uuid>,
    ) -> Result<PatientProfile, DbError> {
        let id_str = id.to_string();

        let query = match tenant {
            Some(_) => {
                "SELECT * FROM type::record('patient_profile', $id) \
                 WHERE tenant_id = $tenant_id"
            }
            None => "SELECT * FROM type::record('patient_profile', $id)",
        };

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));
        if let Some(tenant_id) = tenant {
            builder = builder.bind(("tenant_id", tenant_id.to_string()));
        }

        let mut result = builder.await?;
        let rows: Vec<PatientRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "patient".into(),
            id: id_str,
        })?;

        row.into_profile(id)
    }

    /// Fetch the user row a profile points at. A missing owner means
    /// the cascade invariant was violated, which is a storage-level
    /// inconsistency rather than a NotFound.
    async fn get_owning_user(&self, user_id: Uuid) -> Result<User, DbError> {
        let id_str = user_id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<UserRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| {
            DbError::Query(format!("patient profile has no owning user {id_str}"))
        })?;

        row.into_user(user_id)
    }
}

impl<C: Connection> PatientProfileRepository for SurrealPatientRepository<C> {
    async fn create_for_user(
        &self,
        user: CreateUser,
        profile: CreatePatientProfile,
    ) -> DietlyResult<(User, PatientProfile)> {
        let tenant_id = user.tenant_id.ok_or_else(|| DietlyError::Validation {
            message: "patient account requires a tenant".into(),
        })?;

        let user_id = Uuid::new_v4();
        let profile_id = Uuid::new_v4();
        let password_hash = hash_password(&user.password, self.pepper.as_deref())?;

        // Both inserts commit together or not at all — a duplicate
        // username/email aborts the transaction before the profile row
        // exists, so no orphan account can be observed.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('user', $user_id) SET \
                 tenant_id = $tenant_id, \
                 name = $name, username = $username, email = $email, \
                 password_hash = $password_hash, role = 'PATIENT'; \
                 CREATE type::record('patient_profile', $profile_id) SET \
                 user_id = $user_id, tenant_id = $tenant_id, \
                 date_of_birth = $date_of_birth, gender = $gender, \
                 height_cm = $height_cm, weight_kg = $weight_kg, \
                 initial_weight_kg = $initial_weight_kg, \
                 goal_weight_kg = $goal_weight_kg, \
                 activity_level = $activity_level, \
                 medical_conditions = $medical_conditions, \
                 dietary_preferences = $dietary_preferences; \
                 COMMIT TRANSACTION;",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("profile_id", profile_id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", user.name))
            .bind(("username", user.username))
            .bind(("email", user.email))
            .bind(("password_hash", password_hash))
            .bind(("date_of_birth", profile.date_of_birth.to_string()))
            .bind(("gender", profile.gender.as_str().to_string()))
            .bind(("height_cm", profile.height_cm))
            .bind(("weight_kg", profile.weight_kg))
            .bind(("initial_weight_kg", profile.initial_weight_kg))
            .bind(("goal_weight_kg", profile.goal_weight_kg))
            .bind(("activity_level", profile.activity_level))
            .bind(("medical_conditions", profile.medical_conditions))
            .bind(("dietary_preferences", profile.dietary_preferences))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| write_error(e, "user"))?;

        let user_rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let user = user_rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            })?
            .into_user(user_id)?;

        let profile_rows: Vec<PatientRow> = result.take(1).map_err(DbError::from)?;
        let profile = profile_rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "patient".into(),
                id: profile_id.to_string(),
            })?
            .into_profile(profile_id)?;

        Ok((user, profile))
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> DietlyResult<PatientProfile> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM patient_profile \
                 WHERE user_id = $user_id",
            )
            .bind(("user_id", user_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PatientRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "patient".into(),
            id: format!("user={user_id_str}"),
        })?;

        Ok(row.try_into_profile()?)
    }

    async fn update_by_user_id(
        &self,
        user_id: Uuid,
        input: UpdatePatientProfile,
    ) -> DietlyResult<PatientProfile> {
        let user_id_str = user_id.to_string();

        let mut sets = Vec::new();
        if input.date_of_birth.is_some() {
            sets.push("date_of_birth = $date_of_birth");
        }
        if input.gender.is_some() {
            sets.push("gender = $gender");
        }
        if input.height_cm.is_some() {
            sets.push("height_cm = $height_cm");
        }
        if input.weight_kg.is_some() {
            sets.push("weight_kg = $weight_kg");
        }
        if input.initial_weight_kg.is_some() {
            sets.push("initial_weight_kg = $initial_weight_kg");
        }
        if input.goal_weight_kg.is_some() {
            sets.push("goal_weight_kg = $goal_weight_kg");
        }
        if input.activity_level.is_some() {
            sets.push("activity_level = $activity_level");
        }
        if input.medical_conditions.is_some() {
            sets.push("medical_conditions = $medical_conditions");
        }
        if input.dietary_preferences.is_some() {
            sets.push("dietary_preferences = $dietary_preferences");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE patient_profile SET {} WHERE user_id = $user_id; \
             SELECT meta::id(id) AS record_id, * FROM patient_profile \
             WHERE user_id = $user_id;",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("user_id", user_id_str.clone()));

        if let Some(date_of_birth) = input.date_of_birth {
            builder = builder.bind(("date_of_birth", date_of_birth.to_string()));
        }
        if let Some(gender) = input.gender {
            builder = builder.bind(("gender", gender.as_str().to_string()));
        }
        if let Some(height_cm) = input.height_cm {
            builder = builder.bind(("height_cm", height_cm));
        }
        if let Some(weight_kg) = input.weight_kg {
            builder = builder.bind(("weight_kg", weight_kg));
        }
        if let Some(initial_weight_kg) = input.initial_weight_kg {
            builder = builder.bind(("initial_weight_kg", initial_weight_kg));
        }
        if let Some(goal_weight_kg) = input.goal_weight_kg {
            builder = builder.bind(("goal_weight_kg", goal_weight_kg));
        }
        if let Some(activity_level) = input.activity_level {
            builder = builder.bind(("activity_level", activity_level));
        }
        if let Some(medical_conditions) = input.medical_conditions {
            builder = builder.bind(("medical_conditions", medical_conditions));
        }
        if let Some(dietary_preferences) = input.dietary_preferences {
            builder = builder.bind(("dietary_preferences", dietary_preferences));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<PatientRowWithId> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "patient".into(),
            id: format!("user={user_id_str}"),
        })?;

        Ok(row.try_into_profile()?)
    }

    async fn get_by_identifier(
        &self,
        identifier: &str,
        tenant: Option<Uuid>,
    ) -> DietlyResult<PatientWithUser> {
        // A UUID identifies the profile record; anything else is the
        // owning user's username.
        if let Ok(profile_id) = Uuid::parse_str(identifier) {
            let profile = self.get_profile_by_id(profile_id, tenant).await?;
            let user = self.get_owning_user(profile.user_id).await?;
            return Ok(PatientWithUser { profile, user });
        }

        let query = match tenant {
            Some(_) => {
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE username = $username AND role = 'PATIENT' \
                 AND tenant_id = $tenant_id"
            }
            None => {
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE username = $username AND role = 'PATIENT'"
            }
        };

        let mut builder = self
            .db
            .query(query)
            .bind(("username", identifier.to_string()));
        if let Some(tenant_id) = tenant {
            builder = builder.bind(("tenant_id", tenant_id.to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let user = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "patient".into(),
                id: identifier.to_string(),
            })?
            .try_into_user()?;

        let profile = self.get_by_user_id(user.id).await?;
        Ok(PatientWithUser { profile, user })
    }

    async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> DietlyResult<PaginatedResult<PatientWithUser>> {
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM patient_profile \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM patient_profile \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset; \
                 SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE tenant_id = $tenant_id AND role = 'PATIENT';",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let profile_rows: Vec<PatientRowWithId> = result.take(0).map_err(DbError::from)?;
        let user_rows: Vec<UserRowWithId> = result.take(1).map_err(DbError::from)?;

        let users = user_rows
            .into_iter()
            .map(|row| row.try_into_user().map(|u| (u.id, u)))
            .collect::<Result<std::collections::HashMap<_, _>, DbError>>()?;

        let mut items = Vec::with_capacity(profile_rows.len());
        for row in profile_rows {
            let profile = row.try_into_profile()?;
            let user = users.get(&profile.user_id).cloned().ok_or_else(|| {
                DbError::Query(format!("patient profile {} has no owning user", profile.id))
            })?;
            items.push(PatientWithUser { profile, user });
        }

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
