use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tradegate_domain::PermissionId;

use crate::dto::{PermissionRequest, PermissionResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .permission_service
        .list_permissions()
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<PermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .permission_service
        .save_permission(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<PermissionId>,
    Json(payload): Json<PermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .permission_service
        .update_permission(permission_id, payload.into())
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<PermissionId>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .delete_permission(permission_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
