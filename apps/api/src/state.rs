use std::sync::Arc;

use tradegate_application::{
    AuthorizationGraphRepository, FallbackRole, PermissionService, RoleService, UserRoleService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub permission_service: PermissionService,
    pub role_service: RoleService,
    pub user_role_service: UserRoleService,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn AuthorizationGraphRepository>,
        fallback_role: FallbackRole,
    ) -> Self {
        Self {
            permission_service: PermissionService::new(repository.clone()),
            role_service: RoleService::new(repository.clone(), fallback_role.clone()),
            user_role_service: UserRoleService::new(repository, fallback_role),
        }
    }
}
