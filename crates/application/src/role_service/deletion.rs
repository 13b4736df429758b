use tracing::info;
use tradegate_core::{AppError, AppResult};
use tradegate_domain::RoleId;

use super::RoleService;

impl RoleService {
    /// Deletes a role, its grants and its assignments in one unit of work.
    ///
    /// Users left without any role are linked to the fallback role. The
    /// fallback role itself cannot be deleted.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut unit = self.repository.begin().await?;

        let role = unit
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("role '{role_id}' does not exist")))?;

        let fallback_role = unit
            .find_role_by_name(self.fallback_role.name())
            .await?
            .ok_or_else(|| self.fallback_role.missing())?;

        if fallback_role.id() == role.id() {
            return Err(AppError::Validation(format!(
                "fallback role '{}' cannot be deleted",
                role.name()
            )));
        }

        let mut assignments = unit.find_user_roles_by_role(role_id).await?;
        assignments.sort_by_key(|assignment| assignment.user_id);

        let mut reassigned_users = 0_usize;
        for assignment in &assignments {
            // The user row stays locked until commit; the count below cannot go stale.
            unit.lock_user(assignment.user_id).await?;
            unit.delete_user_roles(&[assignment.id]).await?;

            if unit.count_user_roles(assignment.user_id).await? == 0 {
                unit.insert_user_role(assignment.user_id, fallback_role.id())
                    .await?;
                reassigned_users += 1;
            }
        }

        let grants = unit
            .find_role_permissions_by_role(role_id)
            .await?
            .into_iter()
            .map(|link| link.id)
            .collect::<Vec<_>>();
        if !grants.is_empty() {
            unit.delete_role_permissions(&grants).await?;
        }

        unit.delete_role(role_id).await?;
        unit.commit().await?;

        info!(
            role_id = %role_id,
            role_name = %role.name(),
            affected_users = assignments.len(),
            reassigned_users,
            fallback_role = %fallback_role.name(),
            "role deleted"
        );

        Ok(())
    }
}
