use std::sync::Arc;

use tracing::info;
use tradegate_core::{AppError, AppResult};
use tradegate_domain::{Permission, PermissionDraft, PermissionId};

use crate::authorization_graph_ports::{AuthorizationGraphRepository, PermissionInput};


/// Application service for permission administration.
#[derive(Clone)]
pub struct PermissionService {
    repository: Arc<dyn AuthorizationGraphRepository>,
}

impl PermissionService {
    /// Creates a new service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationGraphRepository>) -> Self {
        Self { repository }
    }

    /// Finds a permission by name.
    pub async fn find_permission_by_name(&self, name: &str) -> AppResult<Permission> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "permission name must not be empty".to_owned(),
            ));
        }

        let mut unit = self.repository.begin().await?;
        unit.find_permission_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("permission '{name}' was not found")))
    }

    /// Finds a permission by id.
    pub async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Permission> {
        let mut unit = self.repository.begin().await?;
        unit.find_permission(permission_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("permission '{permission_id}' was not found"))
        })
    }

    /// Lists every permission.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let mut unit = self.repository.begin().await?;
        unit.list_permissions().await
    }

    /// Creates a permission.
    pub async fn save_permission(&self, input: PermissionInput) -> AppResult<Permission> {
        let draft = PermissionDraft::new(input.name, input.description)?;

        let mut unit = self.repository.begin().await?;
        let permission = unit.insert_permission(draft).await?;
        unit.commit().await?;

        info!(
            permission_id = %permission.id(),
            permission_name = %permission.name(),
            "permission created"
        );

        Ok(permission)
    }

    /// Overwrites permission name and description.
    pub async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: PermissionInput,
    ) -> AppResult<Permission> {
        let draft = PermissionDraft::new(input.name, input.description)?;

        let mut unit = self.repository.begin().await?;
        if unit.find_permission(permission_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }

        let permission = unit.update_permission(permission_id, draft).await?;
        unit.commit().await?;

        Ok(permission)
    }

    /// Deletes a permission that no role grants anymore.
    pub async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut unit = self.repository.begin().await?;
        if unit.find_permission(permission_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "permission '{permission_id}' does not exist"
            )));
        }

        let granting_roles = unit
            .find_role_permissions_by_permission(permission_id)
            .await?;
        if !granting_roles.is_empty() {
            return Err(AppError::Conflict(format!(
                "permission '{permission_id}' is still granted by {} role(s)",
                granting_roles.len()
            )));
        }

        unit.delete_permission(permission_id).await?;
        unit.commit().await?;

        info!(permission_id = %permission_id, "permission deleted");

        Ok(())
    }
}
