//! Dietitian management (per tenant) and dietitian self-service.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use dietly_core::authz::Action;
use dietly_core::error::DietlyError;
use dietly_core::models::dietitian::UpdateDietitianProfile;
use dietly_core::models::user::{CreateUser, UserRole};
use dietly_core::repository::{DietitianProfileRepository, TenantRepository, UserRepository};
use uuid::Uuid;

use crate::dto::{CreateDietitianRequest, DietitianData, Page, PageQuery};
use crate::error::ApiError;
use crate::extract::{AuthUser, authorize, require_role};
use crate::response::ApiResponse;
use crate::state::AppState;

/// `POST /tenants/{id}/dietitians` — SuperAdmin for any tenant, Admin
/// for their own. The path tenant wins over anything in the payload.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(tenant_id): Path<Uuid>,
    Json(req): Json<CreateDietitianRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManageDietitians, Some(tenant_id))?;

    // The target tenant must exist before an account can join it.
    state.tenants.get_by_id(tenant_id).await?;

    let (user, profile) = state
        .dietitians
        .create_for_user(
            CreateUser {
                name: req.name,
                email: req.email,
                username: req.username,
                password: req.password,
                role: UserRole::Dietitian,
                tenant_id: Some(tenant_id),
            },
            req.profile,
        )
        .await?;

    Ok(ApiResponse::created(DietitianData::from((user, profile))))
}

/// `GET /tenants/{id}/dietitians`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(tenant_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManageDietitians, Some(tenant_id))?;

    let result = state
        .dietitians
        .list_by_tenant(tenant_id, page.into_pagination())
        .await?;
    Ok(ApiResponse::ok(Page::<DietitianData>::from_result(result)))
}

/// `DELETE /tenants/{id}/dietitians/{user_id}` — cascade-deletes the
/// account and its profile.
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path((tenant_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManageDietitians, Some(tenant_id))?;

    // Tenant-scoped lookup: a user in another tenant is NotFound.
    let user = state.users.get_scoped(tenant_id, user_id).await?;
    if user.role != UserRole::Dietitian {
        return Err(DietlyError::NotFound {
            entity: "dietitian".into(),
            id: user_id.to_string(),
        }
        .into());
    }

    state.users.delete(user_id).await?;
    Ok(ApiResponse::ok(()))
}

/// `GET /dietitians/profile` — self-service.
pub async fn get_own_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&caller, UserRole::Dietitian)?;
    authorize(&caller, Action::ReadOwnProfile, None)?;

    let profile = state.dietitians.get_by_user_id(caller.user_id).await?;
    Ok(ApiResponse::ok(profile))
}

/// `PUT /dietitians/profile` — self-service partial update.
pub async fn update_own_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(input): Json<UpdateDietitianProfile>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&caller, UserRole::Dietitian)?;
    authorize(&caller, Action::UpdateOwnProfile, None)?;

    let profile = state
        .dietitians
        .update_by_user_id(caller.user_id, input)
        .await?;
    Ok(ApiResponse::ok(profile))
}
