//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Dietitian,
    Patient,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::Admin => "ADMIN",
            UserRole::Dietitian => "DIETITIAN",
            UserRole::Patient => "PATIENT",
        }
    }

    pub fn parse(s: &str) -> Option<UserRole> {
        match s {
            "SUPER_ADMIN" => Some(UserRole::SuperAdmin),
            "ADMIN" => Some(UserRole::Admin),
            "DIETITIAN" => Some(UserRole::Dietitian),
            "PATIENT" => Some(UserRole::Patient),
            _ => None,
        }
    }
}

/// A platform account. `username` and `email` are unique across ALL
/// tenants — they are login identifiers, not tenant-local names.
///
/// `password_hash` is write-only from the API's point of view: the
/// HTTP layer maps users onto hash-free response types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    /// `None` only for SuperAdmin accounts, which live outside any tenant.
    pub tenant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub username: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub role: UserRole,
    pub tenant_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    /// Raw password; re-hashed before storage.
    pub password: Option<String>,
    pub tenant_id: Option<Uuid>,
}

impl UpdateUser {
    /// True when no field is set — callers can skip a no-op write.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.tenant_id.is_none()
    }
}
