use tradegate_application::{PermissionInput, RoleInput, SaveRoleInput};
use tradegate_domain::{Permission, PermissionId, Role, RoleId};

use super::{
    PermissionRequest, PermissionResponse, ReplaceRolePermissionsRequest, RoleResponse,
    SaveRoleRequest, UpdateRoleRequest, UpdateUserRolesRequest,
};

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            permission_id: value.id().value(),
            name: value.name().to_owned(),
            description: value.description().map(str::to_owned),
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().value(),
            name: value.name().to_owned(),
            description: value.description().map(str::to_owned),
        }
    }
}

impl From<PermissionRequest> for PermissionInput {
    fn from(value: PermissionRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

impl From<UpdateRoleRequest> for RoleInput {
    fn from(value: UpdateRoleRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

impl SaveRoleRequest {
    /// Builds the save input, overwriting `role_id` when given.
    pub fn into_input(self, role_id: Option<RoleId>) -> SaveRoleInput {
        SaveRoleInput {
            role_id,
            name: self.name,
            description: self.description,
            permission_ids: self
                .permission_ids
                .into_iter()
                .map(PermissionId::new)
                .collect(),
        }
    }
}

impl ReplaceRolePermissionsRequest {
    pub fn permission_ids(&self) -> Vec<PermissionId> {
        self.permission_ids
            .iter()
            .copied()
            .map(PermissionId::new)
            .collect()
    }
}

impl UpdateUserRolesRequest {
    pub fn role_ids(&self) -> Vec<RoleId> {
        self.role_ids.iter().copied().map(RoleId::new).collect()
    }
}
