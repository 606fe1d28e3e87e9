//! The uniform response envelope.
//!
//! Every endpoint — success or failure — answers with
//! `{"success": bool, "message": string, "data": T | null}`.

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                message: "ok".into(),
                data: Some(data),
            }),
        )
    }

    pub fn created(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
        (
            StatusCode::CREATED,
            Json(ApiResponse {
                success: true,
                message: "created".into(),
                data: Some(data),
            }),
        )
    }
}

impl ApiResponse<()> {
    /// Failure envelope; `data` is always null.
    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
