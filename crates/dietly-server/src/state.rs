//! Shared application state for request handlers.

use dietly_auth::AuthConfig;
use dietly_db::repository::{
    SurrealDietitianRepository, SurrealPatientRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

/// Cloned into every handler. Repository handles share one SurrealDB
/// connection; there is no other shared mutable state.
#[derive(Clone)]
pub struct AppState {
    pub tenants: SurrealTenantRepository<Any>,
    pub users: SurrealUserRepository<Any>,
    pub dietitians: SurrealDietitianRepository<Any>,
    pub patients: SurrealPatientRepository<Any>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(db: Surreal<Any>, auth: AuthConfig) -> Self {
        let (users, dietitians, patients) = match auth.pepper.clone() {
            Some(pepper) => (
                SurrealUserRepository::with_pepper(db.clone(), pepper.clone()),
                SurrealDietitianRepository::with_pepper(db.clone(), pepper.clone()),
                SurrealPatientRepository::with_pepper(db.clone(), pepper),
            ),
            None => (
                SurrealUserRepository::new(db.clone()),
                SurrealDietitianRepository::new(db.clone()),
                SurrealPatientRepository::new(db.clone()),
            ),
        };

        Self {
            tenants: SurrealTenantRepository::new(db),
            users,
            dietitians,
            patients,
            auth,
        }
    }
}
