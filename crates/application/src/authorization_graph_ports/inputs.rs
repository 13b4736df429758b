use tradegate_domain::{PermissionId, RoleId};

/// Input payload for creating or editing a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionInput {
    /// Unique permission name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
}

/// Input payload for editing role fields without touching grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInput {
    /// Unique role name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
}

/// Input payload for saving a role together with its full grant set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRoleInput {
    /// Existing role to overwrite, or `None` to create a new role.
    pub role_id: Option<RoleId>,
    /// Unique role name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Grants replacing any previous grant set, in insertion order.
    pub permission_ids: Vec<PermissionId>,
}
