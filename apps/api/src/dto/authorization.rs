use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Incoming payload for permission creation and edits.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "generated/permission-request.ts"
)]
pub struct PermissionRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// API representation of a permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Incoming payload for creating a role with its grants.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "generated/save-role-request.ts"
)]
pub struct SaveRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub permission_ids: Vec<i64>,
}

/// Incoming payload for editing role fields.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming payload replacing the grants of a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "generated/replace-role-permissions-request.ts"
)]
pub struct ReplaceRolePermissionsRequest {
    pub permission_ids: Vec<i64>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Incoming payload replacing every role of a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "generated/update-user-roles-request.ts"
)]
pub struct UpdateUserRolesRequest {
    pub role_ids: Vec<i64>,
}
