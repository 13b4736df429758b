use serde::{Deserialize, Serialize};

use crate::{PermissionId, RoleId, RolePermissionId, UserId, UserRoleId};

/// Link row granting a permission to a role.
///
/// The `(role_id, permission_id)` pair is unique in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    /// Link identifier.
    pub id: RolePermissionId,
    /// Granting role.
    pub role_id: RoleId,
    /// Granted permission.
    pub permission_id: PermissionId,
}

/// Link row assigning a role to a user.
///
/// The `(user_id, role_id)` pair is unique in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// Link identifier.
    pub id: UserRoleId,
    /// Assigned user.
    pub user_id: UserId,
    /// Assigned role.
    pub role_id: RoleId,
}
