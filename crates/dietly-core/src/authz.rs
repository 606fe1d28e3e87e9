//! Tenant-scoped role-based access control.
//!
//! A single policy table keyed by (role, action), checked per request
//! before any handler logic runs. Two independent gates:
//!
//! 1. role gate — is this action permitted for the caller's role at all?
//! 2. tenant gate — does the target resource belong to the caller's
//!    tenant? SuperAdmin bypasses this gate entirely.
//!
//! Both must pass. A denial carries no detail about which gate failed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// The operations the platform distinguishes for access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// CRUD over clinic records.
    ManageTenants,
    /// Create/list/remove dietitian accounts within a tenant.
    ManageDietitians,
    /// Create/read/update/remove patient accounts within a tenant.
    ManagePatients,
    /// Read one's own profile.
    ReadOwnProfile,
    /// Update one's own profile.
    UpdateOwnProfile,
}

/// The authenticated identity a request acts as, built from validated
/// token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: UserRole,
    pub tenant_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// The fixed (role, action) policy table.
fn role_permits(role: UserRole, action: Action) -> bool {
    use Action::*;
    use UserRole::*;

    matches!(
        (role, action),
        (SuperAdmin, _)
            | (Admin, ManageDietitians)
            | (Dietitian, ManagePatients)
            | (Dietitian, ReadOwnProfile)
            | (Dietitian, UpdateOwnProfile)
            | (Patient, ReadOwnProfile)
            | (Patient, UpdateOwnProfile)
    )
}

/// Decide whether `caller` may perform `action` on a resource that
/// belongs to `resource_tenant` (`None` for resources without a tenant
/// dimension, e.g. the caller's own profile).
///
/// A scoped caller without a tenant affiliation is denied any
/// tenant-targeted action.
pub fn check(caller: &Caller, action: Action, resource_tenant: Option<Uuid>) -> Decision {
    if !role_permits(caller.role, action) {
        return Decision::Deny;
    }

    if caller.role == UserRole::SuperAdmin {
        return Decision::Allow;
    }

    match resource_tenant {
        None => Decision::Allow,
        Some(target) => match caller.tenant_id {
            Some(own) if own == target => Decision::Allow,
            _ => Decision::Deny,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: UserRole, tenant: Option<Uuid>) -> Caller {
        Caller {
            user_id: Uuid::new_v4(),
            role,
            tenant_id: tenant,
        }
    }

    #[test]
    fn super_admin_bypasses_tenant_scoping() {
        let c = caller(UserRole::SuperAdmin, None);
        let foreign = Some(Uuid::new_v4());
        assert!(check(&c, Action::ManageTenants, None).is_allowed());
        assert!(check(&c, Action::ManageDietitians, foreign).is_allowed());
        assert!(check(&c, Action::ManagePatients, foreign).is_allowed());
    }

    #[test]
    fn admin_manages_dietitians_in_own_tenant_only() {
        let home = Uuid::new_v4();
        let c = caller(UserRole::Admin, Some(home));
        assert!(check(&c, Action::ManageDietitians, Some(home)).is_allowed());
        assert!(!check(&c, Action::ManageDietitians, Some(Uuid::new_v4())).is_allowed());
    }

    #[test]
    fn admin_cannot_manage_tenants() {
        let c = caller(UserRole::Admin, Some(Uuid::new_v4()));
        assert!(!check(&c, Action::ManageTenants, None).is_allowed());
    }

    #[test]
    fn dietitian_cross_tenant_denied_regardless_of_role_gate() {
        let c = caller(UserRole::Dietitian, Some(Uuid::new_v4()));
        assert!(!check(&c, Action::ManagePatients, Some(Uuid::new_v4())).is_allowed());
    }

    #[test]
    fn dietitian_manages_patients_in_own_tenant() {
        let home = Uuid::new_v4();
        let c = caller(UserRole::Dietitian, Some(home));
        assert!(check(&c, Action::ManagePatients, Some(home)).is_allowed());
    }

    #[test]
    fn patient_is_self_service_only() {
        let home = Uuid::new_v4();
        let c = caller(UserRole::Patient, Some(home));
        assert!(check(&c, Action::ReadOwnProfile, None).is_allowed());
        assert!(check(&c, Action::UpdateOwnProfile, None).is_allowed());
        assert!(!check(&c, Action::ManagePatients, Some(home)).is_allowed());
        assert!(!check(&c, Action::ManageDietitians, Some(home)).is_allowed());
        assert!(!check(&c, Action::ManageTenants, None).is_allowed());
    }

    #[test]
    fn scoped_caller_without_tenant_is_denied() {
        let c = caller(UserRole::Dietitian, None);
        assert!(!check(&c, Action::ManagePatients, Some(Uuid::new_v4())).is_allowed());
    }
}
