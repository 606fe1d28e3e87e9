//! Dietitian profile domain model.
//!
//! One-to-one extension of a User with role Dietitian. The profile is
//! created in the same transaction as the user and cascade-deleted
//! with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietitianProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Denormalized from the owning user for tenant-scoped queries.
    pub tenant_id: Uuid,
    pub specialization: String,
    pub years_of_experience: u32,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDietitianProfile {
    pub specialization: String,
    pub years_of_experience: u32,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDietitianProfile {
    pub specialization: Option<String>,
    pub years_of_experience: Option<u32>,
    pub bio: Option<String>,
}

/// A dietitian profile joined with its owning user, as returned by
/// tenant listings.
#[derive(Debug, Clone)]
pub struct DietitianWithUser {
    pub profile: DietitianProfile,
    pub user: super::user::User,
}
