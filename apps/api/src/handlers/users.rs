use axum::Json;
use axum::extract::{Path, State};
use tradegate_domain::UserId;

use crate::dto::{RoleResponse, UpdateUserRolesRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .user_role_service
        .list_user_roles(user_id)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn update_user_roles_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UpdateUserRolesRequest>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .user_role_service
        .update_user_roles(user_id, payload.role_ids())
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}
