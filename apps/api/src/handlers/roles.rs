use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tradegate_core::AppError;
use tradegate_domain::RoleId;

use crate::dto::{
    PermissionResponse, ReplaceRolePermissionsRequest, RoleResponse, SaveRoleRequest,
    UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_service
        .find_all_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.role_service.save_role(payload.into_input(None)).await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .find_role(role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .update_role(role_id, payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<StatusCode> {
    state.role_service.delete_role(role_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .role_service
        .list_role_permissions(role_id)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn replace_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
    Json(payload): Json<ReplaceRolePermissionsRequest>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    state
        .role_service
        .replace_role_permissions(role_id, payload.permission_ids())
        .await?;

    list_role_permissions_handler(State(state), Path(role_id)).await
}
