use tradegate_application::{RolePermissionLinkStore, UserRoleLinkStore};

use super::*;

#[async_trait]
impl RolePermissionLinkStore for PostgresAuthorizationGraphUnitOfWork {
    async fn find_role_permissions_by_role(
        &mut self,
        role_id: RoleId,
    ) -> AppResult<Vec<RolePermission>> {
        let rows = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            SELECT id, role_id, permission_id
            FROM role_permissions
            WHERE role_id = $1
            ORDER BY id
            "#,
        )
        .bind(role_id.value())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role grants: {error}")))?;

        Ok(rows.into_iter().map(RolePermission::from).collect())
    }

    async fn find_role_permissions_by_permission(
        &mut self,
        permission_id: PermissionId,
    ) -> AppResult<Vec<RolePermission>> {
        let rows = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            SELECT id, role_id, permission_id
            FROM role_permissions
            WHERE permission_id = $1
            ORDER BY id
            "#,
        )
        .bind(permission_id.value())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permission grants: {error}"))
        })?;

        Ok(rows.into_iter().map(RolePermission::from).collect())
    }

    async fn insert_role_permission(
        &mut self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermission> {
        let row = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            RETURNING id, role_id, permission_id
            "#,
        )
        .bind(role_id.value())
        .bind(permission_id.value())
        .fetch_one(&mut *self.transaction)
        .await
        .map_err(|error| {
            map_write_error(error, "persist role grant", || {
                format!("role '{role_id}' already grants permission '{permission_id}'")
            })
        })?;

        Ok(RolePermission::from(row))
    }

    async fn delete_role_permissions(&mut self, link_ids: &[RolePermissionId]) -> AppResult<()> {
        let ids = link_ids
            .iter()
            .map(RolePermissionId::value)
            .collect::<Vec<_>>();

        sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role grants: {error}")))?;

        Ok(())
    }
}

#[async_trait]
impl UserRoleLinkStore for PostgresAuthorizationGraphUnitOfWork {
    async fn find_user_roles_by_user(&mut self, user_id: UserId) -> AppResult<Vec<UserRole>> {
        let rows = sqlx::query_as::<_, UserRoleRow>(
            r#"
            SELECT id, user_id, role_id
            FROM user_roles
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list user roles: {error}")))?;

        Ok(rows.into_iter().map(UserRole::from).collect())
    }

    async fn find_user_roles_by_role(&mut self, role_id: RoleId) -> AppResult<Vec<UserRole>> {
        let rows = sqlx::query_as::<_, UserRoleRow>(
            r#"
            SELECT id, user_id, role_id
            FROM user_roles
            WHERE role_id = $1
            ORDER BY user_id, id
            "#,
        )
        .bind(role_id.value())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role assignments: {error}"))
        })?;

        Ok(rows.into_iter().map(UserRole::from).collect())
    }

    async fn count_user_roles(&mut self, user_id: UserId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM user_roles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_one(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count user roles: {error}")))?;

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid user role count: {error}")))
    }

    async fn insert_user_role(
        &mut self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<UserRole> {
        let row = sqlx::query_as::<_, UserRoleRow>(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            RETURNING id, user_id, role_id
            "#,
        )
        .bind(user_id.value())
        .bind(role_id.value())
        .fetch_one(&mut *self.transaction)
        .await
        .map_err(|error| {
            map_write_error(error, "assign role", || {
                format!("user '{user_id}' already holds role '{role_id}'")
            })
        })?;

        Ok(UserRole::from(row))
    }

    async fn delete_user_roles(&mut self, link_ids: &[UserRoleId]) -> AppResult<()> {
        let ids = link_ids.iter().map(UserRoleId::value).collect::<Vec<_>>();

        sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete role assignments: {error}"))
        })?;

        Ok(())
    }
}
