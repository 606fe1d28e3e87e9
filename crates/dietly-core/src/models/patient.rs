//! Patient profile domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Gender> {
        match s {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            "OTHER" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// One-to-one extension of a User with role Patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Denormalized from the owning user for tenant-scoped queries.
    pub tenant_id: Uuid,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub initial_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub medical_conditions: Option<String>,
    pub dietary_preferences: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientProfile {
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub initial_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub medical_conditions: Option<String>,
    pub dietary_preferences: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePatientProfile {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub initial_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub medical_conditions: Option<String>,
    pub dietary_preferences: Option<String>,
}

/// A patient profile joined with its owning user, as returned by
/// tenant listings and identifier lookups.
#[derive(Debug, Clone)]
pub struct PatientWithUser {
    pub profile: PatientProfile,
    pub user: super::user::User,
}
