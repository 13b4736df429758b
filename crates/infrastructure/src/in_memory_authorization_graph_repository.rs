use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use tradegate_application::{
    AuthorizationGraphRepository, AuthorizationGraphUnitOfWork, PermissionStore,
    RolePermissionLinkStore, RoleStore, UserRoleLinkStore, UserStore,
};
use tradegate_core::{AppError, AppResult};
use tradegate_domain::{
    Permission, PermissionDraft, PermissionId, Role, RoleDraft, RoleId, RolePermission,
    RolePermissionId, UserId, UserRole, UserRoleId,
};


#[derive(Debug, Clone, Default)]
struct GraphState {
    next_id: i64,
    users: BTreeSet<UserId>,
    permissions: BTreeMap<PermissionId, Permission>,
    roles: BTreeMap<RoleId, Role>,
    role_permissions: BTreeMap<RolePermissionId, RolePermission>,
    user_roles: BTreeMap<UserRoleId, UserRole>,
}

impl GraphState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory authorization graph repository.
///
/// Units of work hold the graph lock until they are committed or dropped,
/// so transactions are fully serialized.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthorizationGraphRepository {
    state: Arc<Mutex<GraphState>>,
}

impl InMemoryAuthorizationGraphRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new user and returns its identifier.
    pub async fn register_user(&self) -> UserId {
        let mut state = self.state.lock().await;
        let user_id = UserId::new(state.next_id());
        state.users.insert(user_id);
        user_id
    }
}

#[async_trait]
impl AuthorizationGraphRepository for InMemoryAuthorizationGraphRepository {
    async fn begin(&self) -> AppResult<Box<dyn AuthorizationGraphUnitOfWork>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();

        Ok(Box::new(InMemoryAuthorizationGraphUnitOfWork { guard, working }))
    }
}

/// Unit of work editing a private copy of the graph.
///
/// The copy replaces the shared graph on commit and is discarded on drop.
pub struct InMemoryAuthorizationGraphUnitOfWork {
    guard: OwnedMutexGuard<GraphState>,
    working: GraphState,
}

#[async_trait]
impl AuthorizationGraphUnitOfWork for InMemoryAuthorizationGraphUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryAuthorizationGraphUnitOfWork {
    async fn lock_user(&mut self, user_id: UserId) -> AppResult<bool> {
        Ok(self.working.users.contains(&user_id))
    }
}

#[async_trait]
impl PermissionStore for InMemoryAuthorizationGraphUnitOfWork {
    async fn find_permission(
        &mut self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        Ok(self.working.permissions.get(&permission_id).cloned())
    }

    async fn find_permission_by_name(&mut self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .working
            .permissions
            .values()
            .find(|permission| permission.name() == name)
            .cloned())
    }

    async fn find_permissions_by_ids(
        &mut self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        Ok(self
            .working
            .permissions
            .values()
            .filter(|permission| permission_ids.contains(&permission.id()))
            .cloned()
            .collect())
    }

    async fn list_permissions(&mut self) -> AppResult<Vec<Permission>> {
        let mut permissions = self
            .working
            .permissions
            .values()
            .cloned()
            .collect::<Vec<_>>();
        permissions.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(permissions)
    }

    async fn insert_permission(&mut self, draft: PermissionDraft) -> AppResult<Permission> {
        self.ensure_permission_name_free(draft.name(), None)?;

        let permission = Permission::new(PermissionId::new(self.working.next_id()), draft);
        self.working
            .permissions
            .insert(permission.id(), permission.clone());
        Ok(permission)
    }

    async fn update_permission(
        &mut self,
        permission_id: PermissionId,
        draft: PermissionDraft,
    ) -> AppResult<Permission> {
        if !self.working.permissions.contains_key(&permission_id) {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }
        self.ensure_permission_name_free(draft.name(), Some(permission_id))?;

        let permission = Permission::new(permission_id, draft);
        self.working
            .permissions
            .insert(permission_id, permission.clone());
        Ok(permission)
    }

    async fn delete_permission(&mut self, permission_id: PermissionId) -> AppResult<()> {
        let referenced = self
            .working
            .role_permissions
            .values()
            .any(|link| link.permission_id == permission_id);
        if referenced {
            return Err(AppError::Conflict(format!(
                "permission '{permission_id}' could not be deleted"
            )));
        }

        self.working.permissions.remove(&permission_id);
        Ok(())
    }
}

#[async_trait]
impl RoleStore for InMemoryAuthorizationGraphUnitOfWork {
    async fn find_role(&mut self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.working.roles.get(&role_id).cloned())
    }

    async fn find_role_by_name(&mut self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .working
            .roles
            .values()
            .find(|role| role.name() == name)
            .cloned())
    }

    async fn find_roles_by_ids(&mut self, role_ids: &[RoleId]) -> AppResult<Vec<Role>> {
        Ok(self
            .working
            .roles
            .values()
            .filter(|role| role_ids.contains(&role.id()))
            .cloned()
            .collect())
    }

    async fn list_roles(&mut self) -> AppResult<Vec<Role>> {
        let mut roles = self.working.roles.values().cloned().collect::<Vec<_>>();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(roles)
    }

    async fn insert_role(&mut self, draft: RoleDraft) -> AppResult<Role> {
        self.ensure_role_name_free(draft.name(), None)?;

        let role = Role::new(RoleId::new(self.working.next_id()), draft);
        self.working.roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn update_role(&mut self, role_id: RoleId, draft: RoleDraft) -> AppResult<Role> {
        if !self.working.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }
        self.ensure_role_name_free(draft.name(), Some(role_id))?;

        let role = Role::new(role_id, draft);
        self.working.roles.insert(role_id, role.clone());
        Ok(role)
    }

    async fn delete_role(&mut self, role_id: RoleId) -> AppResult<()> {
        let referenced = self
            .working
            .role_permissions
            .values()
            .any(|link| link.role_id == role_id)
            || self
                .working
                .user_roles
                .values()
                .any(|link| link.role_id == role_id);
        if referenced {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' could not be deleted"
            )));
        }

        self.working.roles.remove(&role_id);
        Ok(())
    }
}

#[async_trait]
impl RolePermissionLinkStore for InMemoryAuthorizationGraphUnitOfWork {
    async fn find_role_permissions_by_role(
        &mut self,
        role_id: RoleId,
    ) -> AppResult<Vec<RolePermission>> {
        Ok(self
            .working
            .role_permissions
            .values()
            .filter(|link| link.role_id == role_id)
            .copied()
            .collect())
    }

    async fn find_role_permissions_by_permission(
        &mut self,
        permission_id: PermissionId,
    ) -> AppResult<Vec<RolePermission>> {
        Ok(self
            .working
            .role_permissions
            .values()
            .filter(|link| link.permission_id == permission_id)
            .copied()
            .collect())
    }

    async fn insert_role_permission(
        &mut self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermission> {
        if !self.working.roles.contains_key(&role_id)
            || !self.working.permissions.contains_key(&permission_id)
        {
            return Err(AppError::Conflict(
                "failed to persist role grant: foreign key violation".to_owned(),
            ));
        }
        let duplicate = self
            .working
            .role_permissions
            .values()
            .any(|link| link.role_id == role_id && link.permission_id == permission_id);
        if duplicate {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' already grants permission '{permission_id}'"
            )));
        }

        let link = RolePermission {
            id: RolePermissionId::new(self.working.next_id()),
            role_id,
            permission_id,
        };
        self.working.role_permissions.insert(link.id, link);
        Ok(link)
    }

    async fn delete_role_permissions(&mut self, link_ids: &[RolePermissionId]) -> AppResult<()> {
        for link_id in link_ids {
            self.working.role_permissions.remove(link_id);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRoleLinkStore for InMemoryAuthorizationGraphUnitOfWork {
    async fn find_user_roles_by_user(&mut self, user_id: UserId) -> AppResult<Vec<UserRole>> {
        Ok(self
            .working
            .user_roles
            .values()
            .filter(|link| link.user_id == user_id)
            .copied()
            .collect())
    }

    async fn find_user_roles_by_role(&mut self, role_id: RoleId) -> AppResult<Vec<UserRole>> {
        let mut links = self
            .working
            .user_roles
            .values()
            .filter(|link| link.role_id == role_id)
            .copied()
            .collect::<Vec<_>>();
        links.sort_by_key(|link| (link.user_id, link.id));
        Ok(links)
    }

    async fn count_user_roles(&mut self, user_id: UserId) -> AppResult<u64> {
        let count = self
            .working
            .user_roles
            .values()
            .filter(|link| link.user_id == user_id)
            .count();

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid user role count: {error}")))
    }

    async fn insert_user_role(
        &mut self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<UserRole> {
        if !self.working.users.contains(&user_id) || !self.working.roles.contains_key(&role_id) {
            return Err(AppError::Conflict(
                "failed to assign role: foreign key violation".to_owned(),
            ));
        }
        let duplicate = self
            .working
            .user_roles
            .values()
            .any(|link| link.user_id == user_id && link.role_id == role_id);
        if duplicate {
            return Err(AppError::Conflict(format!(
                "user '{user_id}' already holds role '{role_id}'"
            )));
        }

        let link = UserRole {
            id: UserRoleId::new(self.working.next_id()),
            user_id,
            role_id,
        };
        self.working.user_roles.insert(link.id, link);
        Ok(link)
    }

    async fn delete_user_roles(&mut self, link_ids: &[UserRoleId]) -> AppResult<()> {
        for link_id in link_ids {
            self.working.user_roles.remove(link_id);
        }
        Ok(())
    }
}

impl InMemoryAuthorizationGraphUnitOfWork {
    fn ensure_permission_name_free(
        &self,
        name: &str,
        owner: Option<PermissionId>,
    ) -> AppResult<()> {
        let taken = self
            .working
            .permissions
            .values()
            .any(|permission| permission.name() == name && Some(permission.id()) != owner);
        if taken {
            return Err(AppError::Conflict(format!(
                "permission '{name}' already exists"
            )));
        }

        Ok(())
    }

    fn ensure_role_name_free(&self, name: &str, owner: Option<RoleId>) -> AppResult<()> {
        let taken = self
            .working
            .roles
            .values()
            .any(|role| role.name() == name && Some(role.id()) != owner);
        if taken {
            return Err(AppError::Conflict(format!("role '{name}' already exists")));
        }

        Ok(())
    }
}
