//! Error types for the Dietly platform.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DietlyError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// Deliberately carries no detail — the caller must not learn
    /// whether the role gate or the tenant gate failed.
    #[error("Authorization denied")]
    AuthorizationDenied,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DietlyResult<T> = Result<T, DietlyError>;
