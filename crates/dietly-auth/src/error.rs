//! Authentication error types.

use dietly_core::error::DietlyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user and wrong password collapse into this one variant
    /// so the caller cannot probe which accounts exist.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for DietlyError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => DietlyError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => DietlyError::Crypto(msg),
        }
    }
}
