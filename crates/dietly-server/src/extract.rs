//! Request authentication and authorization helpers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use dietly_auth::token::validate_access_token;
use dietly_core::authz::{self, Action, Caller};
use dietly_core::error::DietlyError;
use dietly_core::models::user::UserRole;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that authenticates the request from its bearer token.
///
/// Validation is stateless (signature + expiry + issuer); any failure
/// is a 401 before role checks run.
pub struct AuthUser(pub Caller);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        let claims =
            validate_access_token(token, &state.auth).map_err(|_| ApiError::Unauthenticated)?;
        let caller = claims.caller().map_err(|_| ApiError::Unauthenticated)?;

        Ok(AuthUser(caller))
    }
}

/// Run the policy check; a denial is a generic 403.
pub fn authorize(
    caller: &Caller,
    action: Action,
    resource_tenant: Option<Uuid>,
) -> Result<(), ApiError> {
    if authz::check(caller, action, resource_tenant).is_allowed() {
        Ok(())
    } else {
        Err(DietlyError::AuthorizationDenied.into())
    }
}

/// Endpoints bound to one profile kind additionally pin the exact role
/// (a dietitian must not reach the patient self-service surface).
pub fn require_role(caller: &Caller, role: UserRole) -> Result<(), ApiError> {
    if caller.role == role {
        Ok(())
    } else {
        Err(DietlyError::AuthorizationDenied.into())
    }
}

/// Tenant-scoped operations need a tenant affiliation on the caller.
pub fn require_tenant(caller: &Caller) -> Result<Uuid, ApiError> {
    caller
        .tenant_id
        .ok_or_else(|| DietlyError::AuthorizationDenied.into())
}
