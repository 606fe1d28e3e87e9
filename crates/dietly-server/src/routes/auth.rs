//! Login endpoint.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use dietly_auth::service::{AuthService, LoginInput};

use crate::dto::{LoginData, LoginRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// `POST /auth/login` — exchange credentials for an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let svc = AuthService::new(state.users.clone(), state.auth.clone());

    let out = svc
        .login(LoginInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(ApiResponse::ok(LoginData {
        access_token: out.access_token,
        expires_in: out.expires_in,
    }))
}
