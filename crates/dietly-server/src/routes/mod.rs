//! Route table.

use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod auth;
mod dietitians;
mod patients;
mod tenants;

pub fn router(state: AppState) -> Router {
    // Permissive CORS for the dashboard frontend.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/tenants", post(tenants::create).get(tenants::list))
        .route(
            "/tenants/{id}",
            get(tenants::get)
                .patch(tenants::update)
                .delete(tenants::remove),
        )
        .route(
            "/tenants/{id}/dietitians",
            post(dietitians::create).get(dietitians::list),
        )
        .route(
            "/tenants/{id}/dietitians/{user_id}",
            delete(dietitians::remove),
        )
        .route(
            "/dietitians/profile",
            get(dietitians::get_own_profile).put(dietitians::update_own_profile),
        )
        .route("/patients", post(patients::create).get(patients::list))
        .route(
            "/patients/profile",
            get(patients::get_own_profile).put(patients::update_own_profile),
        )
        .route(
            "/patients/{id}",
            get(patients::get)
                .patch(patients::update)
                .delete(patients::remove),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Lightweight liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}
