use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use tracing::info;
use tradegate_core::{AppError, AppResult};
use tradegate_domain::{DEFAULT_FALLBACK_ROLE_NAME, Permission, Role, RoleId};

use crate::authorization_graph_ports::AuthorizationGraphRepository;

mod deletion;
mod grants;
#[cfg(test)]
mod tests;

/// Well-known role that users fall back to when they lose their last role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRole(String);

impl FallbackRole {
    /// Creates a fallback role reference by name.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name: String = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "fallback role name must not be empty".to_owned(),
            ));
        }

        Ok(Self(name.to_owned()))
    }

    /// Returns the configured role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn missing(&self) -> AppError {
        AppError::IllegalState(format!("fallback role '{}' does not exist", self.0))
    }
}

impl Default for FallbackRole {
    fn default() -> Self {
        Self(DEFAULT_FALLBACK_ROLE_NAME.to_owned())
    }
}

/// Application service coordinating roles, their grants and the users holding them.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn AuthorizationGraphRepository>,
    fallback_role: FallbackRole,
}

impl RoleService {
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

    /// Checks that the fallback role exists. Called once at startup.
    pub async fn verify_fallback_role(&self) -> AppResult<Role> {
        let mut unit = self.repository.begin().await?;
        let role = unit
            .find_role_by_name(self.fallback_role.name())
            .await?
            .ok_or_else(|| self.fallback_role.missing())?;

        info!(
            role_id = %role.id(),
            role_name = %role.name(),
            "fallback role verified"
        );

        Ok(role)
    }

    /// Finds a role by name. A missing role is not an error.
    pub async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "role name must not be empty".to_owned(),
            ));
        }

        let mut unit = self.repository.begin().await?;
        unit.find_role_by_name(name).await
    }

    /// Finds a role by identifier.
    pub async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let mut unit = self.repository.begin().await?;
        unit.find_role(role_id).await
    }

    /// Lists every role.
    pub async fn find_all_roles(&self) -> AppResult<Vec<Role>> {
        let mut unit = self.repository.begin().await?;
        unit.list_roles().await
    }

    /// Resolves the roles matching the identifiers. Unknown ids are skipped.
    pub async fn find_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<Role>> {
        if role_ids.is_empty() {
            return Err(AppError::Validation(
                "role id list must not be empty".to_owned(),
            ));
        }

        let mut unit = self.repository.begin().await?;
        unit.find_roles_by_ids(role_ids).await
    }

    /// Lists the permissions granted to a role.
    pub async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let mut unit = self.repository.begin().await?;
        if unit.find_role(role_id).await?.is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        let permission_ids = unit
            .find_role_permissions_by_role(role_id)
            .await?
            .into_iter()
            .map(|link| link.permission_id)
            .collect::<Vec<_>>();

        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        unit.find_permissions_by_ids(&permission_ids).await
    }
}

/// Removes repeated values while keeping first-seen order.
pub(crate) fn distinct_in_order<T: Copy + Eq + Hash>(values: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .iter()
        .copied()
        .filter(|value| seen.insert(*value))
        .collect()
}
