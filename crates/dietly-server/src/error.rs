//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dietly_core::error::DietlyError;

use crate::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, malformed, or expired bearer token — rejected before
    /// any role check.
    #[error("authentication required")]
    Unauthenticated,

    #[error(transparent)]
    Domain(#[from] DietlyError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "authentication required".into())
            }
            ApiError::Domain(err) => match err {
                DietlyError::NotFound { entity, .. } => {
                    (StatusCode::NOT_FOUND, format!("{entity} not found"))
                }
                DietlyError::AlreadyExists { entity } => {
                    (StatusCode::CONFLICT, format!("{entity} already exists"))
                }
                // Generic on purpose: the caller must not learn whether
                // the account exists or the token merely expired.
                DietlyError::AuthenticationFailed { .. } => {
                    (StatusCode::UNAUTHORIZED, "invalid credentials".into())
                }
                DietlyError::AuthorizationDenied => (StatusCode::FORBIDDEN, "forbidden".into()),
                DietlyError::Validation { message } => (StatusCode::BAD_REQUEST, message),
                other => {
                    tracing::error!(error = %other, "internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".into(),
                    )
                }
            },
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}
