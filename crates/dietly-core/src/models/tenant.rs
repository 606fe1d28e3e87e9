//! Tenant domain model.
//!
//! A tenant is an isolated clinic workspace. All dietitians and
//! patients are scoped to a tenant; platform administrators
//! (SuperAdmin) live outside any tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    Active,
    Inactive,
    Suspended,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "ACTIVE",
            TenantStatus::Inactive => "INACTIVE",
            TenantStatus::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(s: &str) -> Option<TenantStatus> {
        match s {
            "ACTIVE" => Some(TenantStatus::Active),
            "INACTIVE" => Some(TenantStatus::Inactive),
            "SUSPENDED" => Some(TenantStatus::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Free,
    Basic,
    Premium,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "FREE",
            SubscriptionTier::Basic => "BASIC",
            SubscriptionTier::Premium => "PREMIUM",
        }
    }

    pub fn parse(s: &str) -> Option<SubscriptionTier> {
        match s {
            "FREE" => Some(SubscriptionTier::Free),
            "BASIC" => Some(SubscriptionTier::Basic),
            "PREMIUM" => Some(SubscriptionTier::Premium),
            _ => None,
        }
    }
}

/// A clinic workspace.
///
/// Deleting a tenant does NOT cascade to its users — orphaned users
/// keep their `tenant_id` pointing at the removed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub status: TenantStatus,
    pub subscription: SubscriptionTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
///
/// Status defaults to Active and subscription to Free when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub status: Option<TenantStatus>,
    pub subscription: Option<SubscriptionTier>,
}

/// Fields that can be patched on an existing tenant.
/// `None` means "leave untouched".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub status: Option<TenantStatus>,
    pub subscription: Option<SubscriptionTier>,
}
