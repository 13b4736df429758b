use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use tradegate_core::{AppError, AppResult};
use tradegate_domain::{
    Permission, PermissionDraft, PermissionId, Role, RoleDraft, RoleId, RolePermission,
    RolePermissionId, UserId, UserRole, UserRoleId,
};

use crate::{
    AuthorizationGraphRepository, AuthorizationGraphUnitOfWork, PermissionStore,
    RolePermissionLinkStore, RoleStore, UserRoleLinkStore, UserStore,
};

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeState {
    next_id: i64,
    pub(crate) users: BTreeSet<UserId>,
    pub(crate) permissions: Vec<Permission>,
    pub(crate) roles: Vec<Role>,
    pub(crate) role_permissions: Vec<RolePermission>,
    pub(crate) user_roles: Vec<UserRole>,
}

impl FakeState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn role_ids_of(&self, user_id: UserId) -> Vec<RoleId> {
        self.user_roles
            .iter()
            .filter(|link| link.user_id == user_id)
            .map(|link| link.role_id)
            .collect()
    }

    pub(crate) fn grants_of(&self, role_id: RoleId) -> Vec<PermissionId> {
        self.role_permissions
            .iter()
            .filter(|link| link.role_id == role_id)
            .map(|link| link.permission_id)
            .collect()
    }
}

/// Snapshot-committing graph used by service tests.
#[derive(Clone, Default)]
pub(crate) struct FakeGraph {
    state: Arc<Mutex<FakeState>>,
    fail_user_role_inserts: Arc<AtomicBool>,
    begun_units: Arc<AtomicUsize>,
}

impl FakeGraph {
    pub(crate) async fn snapshot(&self) -> FakeState {
        self.state.lock().await.clone()
    }

    pub(crate) fn begun_units(&self) -> usize {
        self.begun_units.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_user_role_inserts(&self) {
        self.fail_user_role_inserts.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn seed_user(&self) -> UserId {
        let mut state = self.state.lock().await;
        let user_id = UserId::new(state.next_id());
        state.users.insert(user_id);
        user_id
    }

    pub(crate) async fn seed_permission(&self, name: &str) -> Permission {
        let mut state = self.state.lock().await;
        let id = PermissionId::new(state.next_id());
        let permission = Permission::new(
            id,
            PermissionDraft::new(name, None).unwrap_or_else(|_| unreachable!()),
        );
        state.permissions.push(permission.clone());
        permission
    }

    pub(crate) async fn seed_role(&self, name: &str, grants: &[PermissionId]) -> Role {
        let mut state = self.state.lock().await;
        let role = Role::new(
            RoleId::new(state.next_id()),
            RoleDraft::new(name, None).unwrap_or_else(|_| unreachable!()),
        );
        state.roles.push(role.clone());
        for permission_id in grants {
            let id = RolePermissionId::new(state.next_id());
            state.role_permissions.push(RolePermission {
                id,
                role_id: role.id(),
                permission_id: *permission_id,
            });
        }
        role
    }

    pub(crate) async fn seed_assignment(&self, user_id: UserId, role_id: RoleId) {
        let mut state = self.state.lock().await;
        let id = UserRoleId::new(state.next_id());
        state.user_roles.push(UserRole {
            id,
            user_id,
            role_id,
        });
    }
}

#[async_trait]
impl AuthorizationGraphRepository for FakeGraph {
    async fn begin(&self) -> AppResult<Box<dyn AuthorizationGraphUnitOfWork>> {
        self.begun_units.fetch_add(1, Ordering::SeqCst);
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(FakeUnitOfWork {
            guard,
            working,
            fail_user_role_inserts: self.fail_user_role_inserts.load(Ordering::SeqCst),
        }))
    }
}

struct FakeUnitOfWork {
    guard: OwnedMutexGuard<FakeState>,
    working: FakeState,
    fail_user_role_inserts: bool,
}

#[async_trait]
impl AuthorizationGraphUnitOfWork for FakeUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let FakeUnitOfWork {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl PermissionStore for FakeUnitOfWork {
    async fn find_permission(
        &mut self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .working
            .permissions
            .iter()
            .find(|permission| permission.id() == permission_id)
            .cloned())
    }

    async fn find_permission_by_name(&mut self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .working
            .permissions
            .iter()
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
            .iter()
            .filter(|permission| permission_ids.contains(&permission.id()))
            .cloned()
            .collect())
    }

    async fn list_permissions(&mut self) -> AppResult<Vec<Permission>> {
        Ok(self.working.permissions.clone())
    }

    async fn insert_permission(&mut self, draft: PermissionDraft) -> AppResult<Permission> {
        if self
            .working
            .permissions
            .iter()
            .any(|permission| permission.name() == draft.name())
        {
            return Err(AppError::Conflict("permission name taken".to_owned()));
        }
        let permission = Permission::new(PermissionId::new(self.working.next_id()), draft);
        self.working.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn update_permission(
        &mut self,
        permission_id: PermissionId,
        draft: PermissionDraft,
    ) -> AppResult<Permission> {
        let slot = self
            .working
            .permissions
            .iter_mut()
            .find(|permission| permission.id() == permission_id)
            .ok_or_else(|| AppError::NotFound("permission".to_owned()))?;
        *slot = Permission::new(permission_id, draft);
        Ok(slot.clone())
    }

    async fn delete_permission(&mut self, permission_id: PermissionId) -> AppResult<()> {
        self.working
            .permissions
            .retain(|permission| permission.id() != permission_id);
        Ok(())
    }
}

#[async_trait]
impl RoleStore for FakeUnitOfWork {
    async fn find_role(&mut self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .working
            .roles
            .iter()
            .find(|role| role.id() == role_id)
            .cloned())
    }

    async fn find_role_by_name(&mut self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .working
            .roles
            .iter()
            .find(|role| role.name() == name)
            .cloned())
    }

    async fn find_roles_by_ids(&mut self, role_ids: &[RoleId]) -> AppResult<Vec<Role>> {
        Ok(self
            .working
            .roles
            .iter()
            .filter(|role| role_ids.contains(&role.id()))
            .cloned()
            .collect())
    }

    async fn list_roles(&mut self) -> AppResult<Vec<Role>> {
        Ok(self.working.roles.clone())
    }

    async fn insert_role(&mut self, draft: RoleDraft) -> AppResult<Role> {
        if self
            .working
            .roles
            .iter()
            .any(|role| role.name() == draft.name())
        {
            return Err(AppError::Conflict("role name taken".to_owned()));
        }
        let role = Role::new(RoleId::new(self.working.next_id()), draft);
        self.working.roles.push(role.clone());
        Ok(role)
    }

    async fn update_role(&mut self, role_id: RoleId, draft: RoleDraft) -> AppResult<Role> {
        let slot = self
            .working
            .roles
            .iter_mut()
            .find(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound("role".to_owned()))?;
        *slot = Role::new(role_id, draft);
        Ok(slot.clone())
    }

    async fn delete_role(&mut self, role_id: RoleId) -> AppResult<()> {
        self.working.roles.retain(|role| role.id() != role_id);
        Ok(())
    }
}

#[async_trait]
impl UserStore for FakeUnitOfWork {
    async fn lock_user(&mut self, user_id: UserId) -> AppResult<bool> {
        Ok(self.working.users.contains(&user_id))
    }
}

#[async_trait]
impl RolePermissionLinkStore for FakeUnitOfWork {
    async fn find_role_permissions_by_role(
        &mut self,
        role_id: RoleId,
    ) -> AppResult<Vec<RolePermission>> {
        Ok(self
            .working
            .role_permissions
            .iter()
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
            .iter()
            .filter(|link| link.permission_id == permission_id)
            .copied()
            .collect())
    }

    async fn insert_role_permission(
        &mut self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermission> {
        if self
            .working
            .role_permissions
            .iter()
            .any(|link| link.role_id == role_id && link.permission_id == permission_id)
        {
            return Err(AppError::Conflict("duplicate grant".to_owned()));
        }
        let link = RolePermission {
            id: RolePermissionId::new(self.working.next_id()),
            role_id,
            permission_id,
        };
        self.working.role_permissions.push(link);
        Ok(link)
    }

    async fn delete_role_permissions(&mut self, link_ids: &[RolePermissionId]) -> AppResult<()> {
        self.working
            .role_permissions
            .retain(|link| !link_ids.contains(&link.id));
        Ok(())
    }
}

#[async_trait]
impl UserRoleLinkStore for FakeUnitOfWork {
    async fn find_user_roles_by_user(&mut self, user_id: UserId) -> AppResult<Vec<UserRole>> {
        Ok(self
            .working
            .user_roles
            .iter()
            .filter(|link| link.user_id == user_id)
            .copied()
            .collect())
    }

    async fn find_user_roles_by_role(&mut self, role_id: RoleId) -> AppResult<Vec<UserRole>> {
        Ok(self
            .working
            .user_roles
            .iter()
            .filter(|link| link.role_id == role_id)
            .copied()
            .collect())
    }

    async fn count_user_roles(&mut self, user_id: UserId) -> AppResult<u64> {
        Ok(self.working.role_ids_of(user_id).len() as u64)
    }

    async fn insert_user_role(
        &mut self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<UserRole> {
        if self.fail_user_role_inserts {
            return Err(AppError::Internal("injected user role failure".to_owned()));
        }
        if self.working.role_ids_of(user_id).contains(&role_id) {
            return Err(AppError::Conflict("duplicate assignment".to_owned()));
        }
        let link = UserRole {
            id: UserRoleId::new(self.working.next_id()),
            user_id,
            role_id,
        };
        self.working.user_roles.push(link);
        Ok(link)
    }

    async fn delete_user_roles(&mut self, link_ids: &[UserRoleId]) -> AppResult<()> {
        self.working
            .user_roles
            .retain(|link| !link_ids.contains(&link.id));
        Ok(())
    }
}
