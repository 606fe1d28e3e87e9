//! Dietly Core — domain models, repository trait definitions, and the
//! tenant-scoped authorization policy shared across all crates.

pub mod authz;
pub mod error;
pub mod models;
pub mod repository;

pub use error::{DietlyError, DietlyResult};
