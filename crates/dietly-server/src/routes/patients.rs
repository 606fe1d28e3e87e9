//! Patient management (dietitian surface) and patient self-service.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use dietly_core::authz::{Action, Caller};
use dietly_core::models::patient::UpdatePatientProfile;
use dietly_core::models::user::{CreateUser, UpdateUser, UserRole};
use dietly_core::repository::{PatientProfileRepository, UserRepository};
use uuid::Uuid;

use crate::dto::{CreatePatientRequest, Page, PageQuery, PatientData, UpdatePatientRequest};
use crate::error::ApiError;
use crate::extract::{AuthUser, authorize, require_role, require_tenant};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Tenant filter for patient lookups: SuperAdmin sees across tenants,
/// everyone else only within their own.
fn lookup_scope(caller: &Caller) -> Result<Option<Uuid>, ApiError> {
    if caller.role == UserRole::SuperAdmin {
        Ok(None)
    } else {
        require_tenant(caller).map(Some)
    }
}

/// `POST /patients` — the new patient always lands in the caller's
/// tenant, regardless of anything the client sends.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(req): Json<CreatePatientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&caller, UserRole::Dietitian)?;
    authorize(&caller, Action::ManagePatients, caller.tenant_id)?;
    let tenant_id = require_tenant(&caller)?;

    let (user, profile) = state
        .patients
        .create_for_user(
            CreateUser {
                name: req.name,
                email: req.email,
                username: req.username,
                password: req.password,
                role: UserRole::Patient,
                tenant_id: Some(tenant_id),
            },
            req.profile,
        )
        .await?;

    Ok(ApiResponse::created(PatientData::from((user, profile))))
}

/// `GET /patients` — patients of the caller's tenant.
pub async fn list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&caller, UserRole::Dietitian)?;
    authorize(&caller, Action::ManagePatients, caller.tenant_id)?;
    let tenant_id = require_tenant(&caller)?;

    let result = state
        .patients
        .list_by_tenant(tenant_id, page.into_pagination())
        .await?;
    Ok(ApiResponse::ok(Page::<PatientData>::from_result(result)))
}

/// `GET /patients/{id}` — accepts a profile id or a username. A
/// patient from another tenant is NotFound, never Forbidden.
pub async fn get(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManagePatients, None)?;
    let scope = lookup_scope(&caller)?;

    let record = state.patients.get_by_identifier(&identifier, scope).await?;
    Ok(ApiResponse::ok(PatientData::from(record)))
}

/// `PATCH /patients/{id}` — partial update of account and/or profile
/// fields. A supplied password is re-hashed.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(identifier): Path<String>,
    Json(req): Json<UpdatePatientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManagePatients, None)?;
    let scope = lookup_scope(&caller)?;

    let target = state.patients.get_by_identifier(&identifier, scope).await?;

    let account_patch = UpdateUser {
        name: req.name,
        email: req.email,
        username: req.username,
        password: req.password,
        tenant_id: None,
    };
    if !account_patch.is_empty() {
        state.users.update(target.user.id, account_patch).await?;
    }

    if let Some(profile_patch) = req.profile {
        state
            .patients
            .update_by_user_id(target.user.id, profile_patch)
            .await?;
    }

    // Re-read by profile id — the username may just have changed.
    let fresh = state
        .patients
        .get_by_identifier(&target.profile.id.to_string(), scope)
        .await?;
    Ok(ApiResponse::ok(PatientData::from(fresh)))
}

/// `DELETE /patients/{id}` — deletes the account; the profile goes
/// with it via the cascade.
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, Action::ManagePatients, None)?;
    let scope = lookup_scope(&caller)?;

    let target = state.patients.get_by_identifier(&identifier, scope).await?;
    state.users.delete(target.user.id).await?;
    Ok(ApiResponse::ok(()))
}

/// `GET /patients/profile` — self-service.
pub async fn get_own_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&caller, UserRole::Patient)?;
    authorize(&caller, Action::ReadOwnProfile, None)?;

    let profile = state.patients.get_by_user_id(caller.user_id).await?;
    Ok(ApiResponse::ok(profile))
}

/// `PUT /patients/profile` — self-service partial update.
pub async fn update_own_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(input): Json<UpdatePatientProfile>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&caller, UserRole::Patient)?;
    authorize(&caller, Action::UpdateOwnProfile, None)?;

    let profile = state
        .patients
        .update_by_user_id(caller.user_id, input)
        .await?;
    Ok(ApiResponse::ok(profile))
}
