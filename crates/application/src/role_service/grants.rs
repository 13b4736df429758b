use tracing::info;
use tradegate_core::{AppError, AppResult};
use tradegate_domain::{PermissionId, Role, RoleDraft, RoleId};

use crate::authorization_graph_ports::{AuthorizationGraphUnitOfWork, RoleInput, SaveRoleInput};

use super::{RoleService, distinct_in_order};

impl RoleService {
    /// Creates or overwrites a role together with its full grant set.
    ///
    /// On the update path every existing grant of the role is removed before
    /// the new set is linked. Repeated permission ids are linked once.
    pub async fn save_role(&self, input: SaveRoleInput) -> AppResult<Role> {
        let draft = RoleDraft::new(input.name, input.description)?;
        let permission_ids = required_grants(&input.permission_ids)?;

        let mut unit = self.repository.begin().await?;
        let role = match input.role_id {
            Some(role_id) => {
                let existing = unit.find_role(role_id).await?.ok_or_else(|| {
                    AppError::NotFound(format!("role '{role_id}' was not found"))
                })?;
                self.overwrite_role(unit.as_mut(), &existing, draft, &permission_ids)
                    .await?
            }
            None => {
                ensure_permissions_exist(unit.as_mut(), &permission_ids).await?;
                let role = unit.insert_role(draft).await?;
                link_permissions(unit.as_mut(), role.id(), &permission_ids).await?;
                role
            }
        };
        unit.commit().await?;

        info!(
            role_id = %role.id(),
            role_name = %role.name(),
            permission_count = permission_ids.len(),
            "role saved"
        );

        Ok(role)
    }

    /// Replaces the grant set of an existing role, keeping its name and description.
    pub async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<Role> {
        let permission_ids = required_grants(&permission_ids)?;

        let mut unit = self.repository.begin().await?;
        let existing = unit
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        let role = self
            .overwrite_role(unit.as_mut(), &existing, existing.draft(), &permission_ids)
            .await?;
        unit.commit().await?;

        info!(
            role_id = %role.id(),
            role_name = %role.name(),
            permission_count = permission_ids.len(),
            "role permissions replaced"
        );

        Ok(role)
    }

    /// Updates role name and description. Grants are left untouched.
    ///
    /// The role must already hold at least one grant.
    pub async fn update_role(&self, role_id: RoleId, input: RoleInput) -> AppResult<Role> {
        let draft = RoleDraft::new(input.name, input.description)?;

        let mut unit = self.repository.begin().await?;
        let existing = unit
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("role '{role_id}' does not exist")))?;

        if unit.find_role_permissions_by_role(role_id).await?.is_empty() {
            return Err(AppError::Validation(
                "role must have at least one assigned permission".to_owned(),
            ));
        }
        self.ensure_fallback_keeps_name(&existing, &draft)?;

        let role = unit.update_role(role_id, draft).await?;
        unit.commit().await?;

        Ok(role)
    }

    async fn overwrite_role(
        &self,
        unit: &mut dyn AuthorizationGraphUnitOfWork,
        existing: &Role,
        draft: RoleDraft,
        permission_ids: &[PermissionId],
    ) -> AppResult<Role> {
        self.ensure_fallback_keeps_name(existing, &draft)?;
        ensure_permissions_exist(unit, permission_ids).await?;

        let role = unit.update_role(existing.id(), draft).await?;
        let previous_links = unit
            .find_role_permissions_by_role(existing.id())
            .await?
            .into_iter()
            .map(|link| link.id)
            .collect::<Vec<_>>();
        if !previous_links.is_empty() {
            unit.delete_role_permissions(&previous_links).await?;
        }
        link_permissions(unit, role.id(), permission_ids).await?;

        Ok(role)
    }

    // Role names are unique, so matching the configured name identifies the fallback row.
    fn ensure_fallback_keeps_name(&self, existing: &Role, draft: &RoleDraft) -> AppResult<()> {
        if existing.name() == self.fallback_role.name() && draft.name() != existing.name() {
            return Err(AppError::Validation(format!(
                "fallback role '{}' cannot be renamed",
                existing.name()
            )));
        }

        Ok(())
    }
}

fn required_grants(permission_ids: &[PermissionId]) -> AppResult<Vec<PermissionId>> {
    if permission_ids.is_empty() {
        return Err(AppError::Validation(
            "a role must be assigned at least one permission".to_owned(),
        ));
    }

    Ok(distinct_in_order(permission_ids))
}

async fn ensure_permissions_exist(
    unit: &mut dyn AuthorizationGraphUnitOfWork,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    let found = unit.find_permissions_by_ids(permission_ids).await?;
    if let Some(missing) = permission_ids
        .iter()
        .find(|permission_id| !found.iter().any(|permission| permission.id() == **permission_id))
    {
        return Err(AppError::NotFound(format!(
            "permission '{missing}' was not found"
        )));
    }

    Ok(())
}

async fn link_permissions(
    unit: &mut dyn AuthorizationGraphUnitOfWork,
    role_id: RoleId,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    for permission_id in permission_ids {
        unit.insert_role_permission(role_id, *permission_id).await?;
    }

    Ok(())
}
