//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups reachable by
//! non-SuperAdmin callers take an explicit tenant filter and report a
//! cross-tenant entity as NotFound — tenant isolation must not leak
//! existence. The unscoped variants exist for the login path and for
//! SuperAdmin operations only.

use uuid::Uuid;

use crate::error::DietlyResult;
use crate::models::{
    dietitian::{
        CreateDietitianProfile, DietitianProfile, DietitianWithUser, UpdateDietitianProfile,
    },
    patient::{CreatePatientProfile, PatientProfile, PatientWithUser, UpdatePatientProfile},
    tenant::{CreateTenant, Tenant, UpdateTenant},
    user::{CreateUser, UpdateUser, User, UserRole},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenant registry (global scope, SuperAdmin surface)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = DietlyResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = DietlyResult<Tenant>> + Send;
    /// Partial patch — unspecified fields are untouched.
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = DietlyResult<Tenant>> + Send;
    /// Does NOT cascade to the tenant's users.
    fn delete(&self, id: Uuid) -> impl Future<Output = DietlyResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = DietlyResult<PaginatedResult<Tenant>>> + Send;
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Hashes the raw password before insertion. Duplicate username or
    /// email surfaces as AlreadyExists.
    fn create(&self, input: CreateUser) -> impl Future<Output = DietlyResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = DietlyResult<User>> + Send;
    /// Global lookup — the login path. Username is unique across tenants.
    fn get_by_username(&self, username: &str) -> impl Future<Output = DietlyResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = DietlyResult<User>> + Send;
    /// Tenant-filtered lookup; an entity in another tenant is NotFound.
    fn get_scoped(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = DietlyResult<User>> + Send;
    /// Partial patch; a supplied raw password is re-hashed.
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = DietlyResult<User>> + Send;
    /// Hard-deletes the user and any profile row referencing it, in one
    /// transaction (cascade).
    fn delete(&self, id: Uuid) -> impl Future<Output = DietlyResult<()>> + Send;
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        role: Option<UserRole>,
        pagination: Pagination,
    ) -> impl Future<Output = DietlyResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Profile repositories (one-to-one extensions of User)
// ---------------------------------------------------------------------------

pub trait DietitianProfileRepository: Send + Sync {
    /// Inserts the user row (role forced to Dietitian) and the profile
    /// row as ONE transaction — if either statement fails nothing is
    /// committed. `user.tenant_id` must be set.
    fn create_for_user(
        &self,
        user: CreateUser,
        profile: CreateDietitianProfile,
    ) -> impl Future<Output = DietlyResult<(User, DietitianProfile)>> + Send;
    fn get_by_user_id(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = DietlyResult<DietitianProfile>> + Send;
    /// Merges provided fields; NotFound when no profile exists.
    fn update_by_user_id(
        &self,
        user_id: Uuid,
        input: UpdateDietitianProfile,
    ) -> impl Future<Output = DietlyResult<DietitianProfile>> + Send;
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = DietlyResult<PaginatedResult<DietitianWithUser>>> + Send;
}

pub trait PatientProfileRepository: Send + Sync {
    /// See [`DietitianProfileRepository::create_for_user`]; the role is
    /// forced to Patient.
    fn create_for_user(
        &self,
        user: CreateUser,
        profile: CreatePatientProfile,
    ) -> impl Future<Output = DietlyResult<(User, PatientProfile)>> + Send;
    fn get_by_user_id(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = DietlyResult<PatientProfile>> + Send;
    fn update_by_user_id(
        &self,
        user_id: Uuid,
        input: UpdatePatientProfile,
    ) -> impl Future<Output = DietlyResult<PatientProfile>> + Send;
    /// `identifier` is a profile id (UUID) or the owning user's
    /// username. With a tenant filter, a cross-tenant match is NotFound.
    fn get_by_identifier(
        &self,
        identifier: &str,
        tenant: Option<Uuid>,
    ) -> impl Future<Output = DietlyResult<PatientWithUser>> + Send;
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = DietlyResult<PaginatedResult<PatientWithUser>>> + Send;
}
