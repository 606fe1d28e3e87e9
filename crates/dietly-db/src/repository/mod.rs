//! SurrealDB repository implementations.

mod dietitian;
mod patient;
mod tenant;
mod user;

pub use dietitian::SurrealDietitianRepository;
pub use patient::SurrealPatientRepository;
pub use tenant::SurrealTenantRepository;
pub use user::SurrealUserRepository;
