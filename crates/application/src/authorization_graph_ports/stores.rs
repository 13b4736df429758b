use async_trait::async_trait;

use tradegate_core::AppResult;
use tradegate_domain::{Permission, PermissionDraft, PermissionId, Role, RoleDraft, RoleId, UserId};

/// Store port for permission rows.
#[async_trait]
pub trait PermissionStore: Send {
    /// Finds a permission by identifier.
    async fn find_permission(&mut self, permission_id: PermissionId)
    -> AppResult<Option<Permission>>;

    /// Finds a permission by its unique name.
    async fn find_permission_by_name(&mut self, name: &str) -> AppResult<Option<Permission>>;

    /// Returns the permissions matching the identifiers, ordered by id. Unknown ids are skipped.
    async fn find_permissions_by_ids(
        &mut self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>>;

    /// Lists every permission ordered by name.
    async fn list_permissions(&mut self) -> AppResult<Vec<Permission>>;

    /// Inserts a permission and returns the stored row.
    async fn insert_permission(&mut self, draft: PermissionDraft) -> AppResult<Permission>;

    /// Overwrites permission fields and returns the stored row.
    async fn update_permission(
        &mut self,
        permission_id: PermissionId,
        draft: PermissionDraft,
    ) -> AppResult<Permission>;

    /// Deletes a permission row.
    async fn delete_permission(&mut self, permission_id: PermissionId) -> AppResult<()>;
}

/// Store port for role rows.
#[async_trait]
pub trait RoleStore: Send {
    /// Finds a role by identifier.
    async fn find_role(&mut self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by its unique name.
    async fn find_role_by_name(&mut self, name: &str) -> AppResult<Option<Role>>;

    /// Returns the roles matching the identifiers, ordered by id. Unknown ids are skipped.
    async fn find_roles_by_ids(&mut self, role_ids: &[RoleId]) -> AppResult<Vec<Role>>;

    /// Lists every role ordered by name.
    async fn list_roles(&mut self) -> AppResult<Vec<Role>>;

    /// Inserts a role and returns the stored row.
    async fn insert_role(&mut self, draft: RoleDraft) -> AppResult<Role>;

    /// Overwrites role fields and returns the stored row.
    async fn update_role(&mut self, role_id: RoleId, draft: RoleDraft) -> AppResult<Role>;

    /// Deletes a role row. Link rows must be removed first.
    async fn delete_role(&mut self, role_id: RoleId) -> AppResult<()>;
}

/// Store port for the externally managed user table.
#[async_trait]
pub trait UserStore: Send {
    /// Locks the user row until the unit of work ends.
    ///
    /// Returns `false` when the user does not exist.
    async fn lock_user(&mut self, user_id: UserId) -> AppResult<bool>;
}
