//! SurrealDB implementation of [`DietitianProfileRepository`].

use chrono::{DateTime, Utc};
use dietly_core::error::{DietlyError, DietlyResult};
use dietly_core::models::dietitian::{
    CreateDietitianProfile, DietitianProfile, DietitianWithUser, UpdateDietitianProfile,
};
use dietly_core::models::user::{CreateUser, User};
use dietly_core::repository::{DietitianProfileRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, write_error};

use super::user::{UserRow, UserRowWithId, hash_password};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct DietitianRow {
    user_id: String,
    tenant_id: String,
    specialization: String,
    years_of_experience: u32,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DietitianRow {
    fn into_profile(self, id: Uuid) -> Result<DietitianProfile, DbError> {
        Ok(DietitianProfile {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            specialization: self.specialization,
            years_of_experience: self.years_of_experience,
            bio: self.bio,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct DietitianRowWithId {
    record_id: String,
    user_id: String,
    tenant_id: String,
    specialization: String,
    years_of_experience: u32,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DietitianRowWithId {
    fn try_into_profile(self) -> Result<DietitianProfile, DbError> {
        let id = parse_uuid(&self.record_id, "dietitian_profile")?;
        Ok(DietitianProfile {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            specialization: self.specialization,
            years_of_experience: self.years_of_experience,
            bio: self.bio,
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

/// SurrealDB implementation of the dietitian profile repository.
#[derive(Clone)]
pub struct SurrealDietitianRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealDietitianRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> DietitianProfileRepository for SurrealDietitianRepository<C> {
    async fn create_for_user(
        &self,
        user: CreateUser,
        profile: CreateDietitianProfile,
    ) -> DietlyResult<(User, DietitianProfile)> {
        let tenant_id = user.tenant_id.ok_or_else(|| DietlyError::Validation {
            message: "dietitian account requires a tenant".into(),
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
                 password_hash = $password_hash, role = 'DIETITIAN'; \
                 CREATE type::record('dietitian_profile', $profile_id) SET \
                 user_id = $user_id, tenant_id = $tenant_id, \
                 specialization = $specialization, \
                 years_of_experience = $years_of_experience, \
                 bio = $bio; \
                 COMMIT TRANSACTION;",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("profile_id", profile_id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", user.name))
            .bind(("username", user.username))
            .bind(("email", user.email))
            .bind(("password_hash", password_hash))
            .bind(("specialization", profile.specialization))
            .bind(("years_of_experience", profile.years_of_experience))
            .bind(("bio", profile.bio))
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

        let profile_rows: Vec<DietitianRow> = result.take(1).map_err(DbError::from)?;
        let profile = profile_rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "dietitian_profile".into(),
                id: profile_id.to_string(),
            })?
            .into_profile(profile_id)?;

        Ok((user, profile))
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> DietlyResult<DietitianProfile> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM dietitian_profile \
                 WHERE user_id = $user_id",
            )
            .bind(("user_id", user_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DietitianRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dietitian_profile".into(),
            id: format!("user={user_id_str}"),
        })?;

        Ok(row.try_into_profile()?)
    }

    async fn update_by_user_id(
        &self,
        user_id: Uuid,
        input: UpdateDietitianProfile,
    ) -> DietlyResult<DietitianProfile> {
        let user_id_str = user_id.to_string();

        let mut sets = Vec::new();
        if input.specialization.is_some() {
            sets.push("specialization = $specialization");
        }
        if input.years_of_experience.is_some() {
            sets.push("years_of_experience = $years_of_experience");
        }
        if input.bio.is_some() {
            sets.push("bio = $bio");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE dietitian_profile SET {} WHERE user_id = $user_id; \
             SELECT meta::id(id) AS record_id, * FROM dietitian_profile \
             WHERE user_id = $user_id;",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("user_id", user_id_str.clone()));

        if let Some(specialization) = input.specialization {
            builder = builder.bind(("specialization", specialization));
        }
        if let Some(years) = input.years_of_experience {
            builder = builder.bind(("years_of_experience", years));
        }
        if let Some(bio) = input.bio {
            builder = builder.bind(("bio", bio));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<DietitianRowWithId> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dietitian_profile".into(),
            id: format!("user={user_id_str}"),
        })?;

        Ok(row.try_into_profile()?)
    }

    async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> DietlyResult<PaginatedResult<DietitianWithUser>> {
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM dietitian_profile \
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
                "SELECT meta::id(id) AS record_id, * FROM dietitian_profile \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset; \
                 SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE tenant_id = $tenant_id AND role = 'DIETITIAN';",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let profile_rows: Vec<DietitianRowWithId> = result.take(0).map_err(DbError::from)?;
        let user_rows: Vec<UserRowWithId> = result.take(1).map_err(DbError::from)?;

        let users = user_rows
            .into_iter()
            .map(|row| row.try_into_user().map(|u| (u.id, u)))
            .collect::<Result<std::collections::HashMap<_, _>, DbError>>()?;

        let mut items = Vec::with_capacity(profile_rows.len());
        for row in profile_rows {
            let profile = row.try_into_profile()?;
            let user = users.get(&profile.user_id).cloned().ok_or_else(|| {
                DbError::Query(format!(
                    "dietitian profile {} has no owning user",
                    profile.id
                ))
            })?;
            items.push(DietitianWithUser { profile, user });
        }

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
