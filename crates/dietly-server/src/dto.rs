//! Request and response payload types.
//!
//! Response types are deliberately separate from the domain models so
//! that the password hash can never serialize into a response body.

use chrono::{DateTime, Utc};
use dietly_core::models::dietitian::{
    CreateDietitianProfile, DietitianProfile, DietitianWithUser,
};
use dietly_core::models::patient::{
    CreatePatientProfile, PatientProfile, PatientWithUser, UpdatePatientProfile,
};
use dietly_core::models::user::{User, UserRole};
use dietly_core::repository::{PaginatedResult, Pagination};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDietitianRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub profile: CreateDietitianProfile,
}

#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub profile: CreatePatientProfile,
}

/// Partial update of a patient: any subset of account fields plus an
/// optional profile patch.
#[derive(Debug, Deserialize, Default)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub profile: Option<UpdatePatientProfile>,
}

/// Pagination query parameters (`?offset=0&limit=50`).
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn into_pagination(self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            offset: self.offset.unwrap_or(defaults.offset),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub access_token: String,
    pub expires_in: u64,
}

/// A user as exposed to clients — everything except the password hash.
#[derive(Debug, Serialize)]
pub struct UserData {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub tenant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            role: user.role,
            tenant_id: user.tenant_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DietitianData {
    pub user: UserData,
    pub profile: DietitianProfile,
}

impl From<(User, DietitianProfile)> for DietitianData {
    fn from((user, profile): (User, DietitianProfile)) -> Self {
        Self {
            user: user.into(),
            profile,
        }
    }
}

impl From<DietitianWithUser> for DietitianData {
    fn from(record: DietitianWithUser) -> Self {
        (record.user, record.profile).into()
    }
}

#[derive(Debug, Serialize)]
pub struct PatientData {
    pub user: UserData,
    pub profile: PatientProfile,
}

impl From<(User, PatientProfile)> for PatientData {
    fn from((user, profile): (User, PatientProfile)) -> Self {
        Self {
            user: user.into(),
            profile,
        }
    }
}

impl From<PatientWithUser> for PatientData {
    fn from(record: PatientWithUser) -> Self {
        (record.user, record.profile).into()
    }
}

/// Serializable page of results.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn from_result<S: Into<T>>(result: PaginatedResult<S>) -> Self {
        Self {
            items: result.items.into_iter().map(Into::into).collect(),
            total: result.total,
            offset: result.offset,
            limit: result.limit,
        }
    }
}
