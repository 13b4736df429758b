mod authorization;
mod common;

pub use authorization::{
    PermissionRequest, PermissionResponse, ReplaceRolePermissionsRequest, RoleResponse,
    SaveRoleRequest, UpdateRoleRequest, UpdateUserRolesRequest,
};
pub use common::HealthResponse;
