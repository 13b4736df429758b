use async_trait::async_trait;

use tradegate_core::AppResult;
use tradegate_domain::{
    PermissionId, RoleId, RolePermission, RolePermissionId, UserId, UserRole, UserRoleId,
};

/// Store port for role-to-permission link rows.
#[async_trait]
pub trait RolePermissionLinkStore: Send {
    /// Lists links held by a role, in insertion order.
    async fn find_role_permissions_by_role(
        &mut self,
        role_id: RoleId,
    ) -> AppResult<Vec<RolePermission>>;

    /// Lists links pointing at a permission.
    async fn find_role_permissions_by_permission(
        &mut self,
        permission_id: PermissionId,
    ) -> AppResult<Vec<RolePermission>>;

    /// Inserts one link. A duplicate pair is a storage conflict.
    async fn insert_role_permission(
        &mut self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermission>;

    /// Deletes the given links.
    async fn delete_role_permissions(&mut self, link_ids: &[RolePermissionId]) -> AppResult<()>;
}

/// Store port for user-to-role link rows.
#[async_trait]
pub trait UserRoleLinkStore: Send {
    /// Lists links held by a user, in insertion order.
    async fn find_user_roles_by_user(&mut self, user_id: UserId) -> AppResult<Vec<UserRole>>;

    /// Lists links pointing at a role, ordered by user.
    async fn find_user_roles_by_role(&mut self, role_id: RoleId) -> AppResult<Vec<UserRole>>;

    /// Counts links held by a user.
    async fn count_user_roles(&mut self, user_id: UserId) -> AppResult<u64>;

    /// Inserts one link. A duplicate pair is a storage conflict.
    async fn insert_user_role(&mut self, user_id: UserId, role_id: RoleId)
    -> AppResult<UserRole>;

    /// Deletes the given links.
    async fn delete_user_roles(&mut self, link_ids: &[UserRoleId]) -> AppResult<()>;
}
