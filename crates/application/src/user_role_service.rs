use std::sync::Arc;

use tracing::{info, warn};
use tradegate_core::{AppError, AppResult};
use tradegate_domain::{Role, RoleId, UserId, UserRole};

use crate::authorization_graph_ports::AuthorizationGraphRepository;
use crate::role_service::{FallbackRole, distinct_in_order};


/// Application service managing which roles a user holds.
#[derive(Clone)]
pub struct UserRoleService {
    repository: Arc<dyn AuthorizationGraphRepository>,
    fallback_role: FallbackRole,
}

impl UserRoleService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuthorizationGraphRepository>,
        fallback_role: FallbackRole,
    ) -> Self {
        Self {
            repository,
            fallback_role,
        }
    }

    /// Replaces every role of a user with the given set.
    ///
    /// Repeated ids are linked once and unknown ids are skipped. An empty
    /// set leaves the user without roles; only role deletion enforces the
    /// fallback role.
    pub async fn update_user_roles(
        &self,
        user_id: UserId,
        role_ids: Vec<RoleId>,
    ) -> AppResult<Vec<Role>> {
        let mut unit = self.repository.begin().await?;
        if !unit.lock_user(user_id).await? {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        let previous_links = unit
            .find_user_roles_by_user(user_id)
            .await?
            .into_iter()
            .map(|link| link.id)
            .collect::<Vec<_>>();
        if !previous_links.is_empty() {
            unit.delete_user_roles(&previous_links).await?;
        }

        let role_ids = distinct_in_order(&role_ids);
        let roles = if role_ids.is_empty() {
            Vec::new()
        } else {
            unit.find_roles_by_ids(&role_ids).await?
        };

        for role in &roles {
            unit.insert_user_role(user_id, role.id()).await?;
        }

        unit.commit().await?;

        if roles.is_empty() {
            warn!(user_id = %user_id, "user roles replaced with an empty set");
        } else {
            info!(
                user_id = %user_id,
                role_count = roles.len(),
                "user roles replaced"
            );
        }

        Ok(roles)
    }

    /// Lists the roles a user holds.
    pub async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let mut unit = self.repository.begin().await?;
        let role_ids = unit
            .find_user_roles_by_user(user_id)
            .await?
            .into_iter()
            .map(|link| link.role_id)
            .collect::<Vec<_>>();

        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        unit.find_roles_by_ids(&role_ids).await
    }

    /// Counts the roles a user holds.
    pub async fn count_user_roles(&self, user_id: UserId) -> AppResult<u64> {
        let mut unit = self.repository.begin().await?;
        unit.count_user_roles(user_id).await
    }

    /// Fails unless the user holds at least one role. Gates user persistence.
    pub async fn ensure_user_has_role(&self, user_id: UserId) -> AppResult<()> {
        if self.count_user_roles(user_id).await? == 0 {
            return Err(AppError::Validation(format!(
                "user '{user_id}' must have at least one assigned role"
            )));
        }

        Ok(())
    }

    /// Links a freshly registered user to the fallback role.
    ///
    /// Returns the existing link when the user already holds it.
    pub async fn assign_fallback_role(&self, user_id: UserId) -> AppResult<UserRole> {
        let mut unit = self.repository.begin().await?;
        if !unit.lock_user(user_id).await? {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        let fallback_role = unit
            .find_role_by_name(self.fallback_role.name())
            .await?
            .ok_or_else(|| self.fallback_role.missing())?;

        if let Some(existing) = unit
            .find_user_roles_by_user(user_id)
            .await?
            .into_iter()
            .find(|link| link.role_id == fallback_role.id())
        {
            return Ok(existing);
        }

        let link = unit.insert_user_role(user_id, fallback_role.id()).await?;
        unit.commit().await?;

        Ok(link)
    }
}
