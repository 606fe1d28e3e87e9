//! Authentication service — login orchestration.

use dietly_core::error::{DietlyError, DietlyResult};
use dietly_core::repository::UserRepository;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over the repository implementation so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    /// Authenticate a user with username + password and issue an
    /// access token.
    ///
    /// Unknown user and wrong password are indistinguishable to the
    /// caller — both surface as the same generic failure.
    pub async fn login(&self, input: LoginInput) -> DietlyResult<LoginOutput> {
        // 1. Look up user — try username first, then email.
        let user = match self.user_repo.get_by_username(&input.username).await {
            Ok(u) => u,
            Err(DietlyError::NotFound { .. }) => self
                .user_repo
                .get_by_email(&input.username)
                .await
                .map_err(|_| AuthError::InvalidCredentials)?,
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )
        .map_err(|e| DietlyError::Crypto(e.to_string()))?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Issue JWT access token.
        let access_token = token::issue_access_token(&user, &self.config)?;

        Ok(LoginOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }
}
