//! Tenant registry endpoints — SuperAdmin only.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use dietly_core::authz::Action;
use dietly_core::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use dietly_core::repository::TenantRepository;
use uuid::Uuid;

use crate::dto::{Page, PageQuery};
use crate::error::ApiError;
use crate::extract::{AuthUser, authorize};
use crate::response::ApiResponse;
use crate::state::AppState;

/// `POST /tenants`
pub async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(input): Json<CreateTenant>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManageTenants, None)?;

    let tenant = state.tenants.create(input).await?;
    Ok(ApiResponse::created(tenant))
}

/// `GET /tenants`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManageTenants, None)?;

    let result = state.tenants.list(page.into_pagination()).await?;
    Ok(ApiResponse::ok(Page::<Tenant>::from_result(result)))
}

/// `GET /tenants/{id}`
pub async fn get(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManageTenants, None)?;

    let tenant = state.tenants.get_by_id(id).await?;
    Ok(ApiResponse::ok(tenant))
}

/// `PATCH /tenants/{id}` — partial patch; unspecified fields are
/// untouched.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTenant>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManageTenants, None)?;

    let tenant = state.tenants.update(id, input).await?;
    Ok(ApiResponse::ok(tenant))
}

/// `DELETE /tenants/{id}` — does not cascade to the tenant's users.
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManageTenants, None)?;

    // Surface NotFound for an id that never existed.
    state.tenants.get_by_id(id).await?;
    state.tenants.delete(id).await?;
    Ok(ApiResponse::ok(()))
}
