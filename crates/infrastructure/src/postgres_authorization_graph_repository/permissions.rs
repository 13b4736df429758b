use tradegate_application::PermissionStore;

use super::*;

#[async_trait]
impl PermissionStore for PostgresAuthorizationGraphUnitOfWork {
    async fn find_permission(
        &mut self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.value())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?
        .map(PermissionRow::into_permission)
        .transpose()
    }

    async fn find_permission_by_name(&mut self, name: &str) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description
            FROM permissions
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?
        .map(PermissionRow::into_permission)
        .transpose()
    }

    async fn find_permissions_by_ids(
        &mut self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        let ids = permission_ids
            .iter()
            .map(PermissionId::value)
            .collect::<Vec<_>>();

        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description
            FROM permissions
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve permissions: {error}")))?
        .into_iter()
        .map(PermissionRow::into_permission)
        .collect()
    }

    async fn list_permissions(&mut self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description
            FROM permissions
            ORDER BY name
            "#,
        )
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?
        .into_iter()
        .map(PermissionRow::into_permission)
        .collect()
    }

    async fn insert_permission(&mut self, draft: PermissionDraft) -> AppResult<Permission> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO permissions (name, description)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(draft.name())
        .bind(draft.description())
        .fetch_one(&mut *self.transaction)
        .await
        .map_err(|error| {
            map_write_error(error, "create permission", || {
                format!("permission '{}' already exists", draft.name())
            })
        })?;

        Ok(Permission::new(PermissionId::new(id), draft))
    }

    async fn update_permission(
        &mut self,
        permission_id: PermissionId,
        draft: PermissionDraft,
    ) -> AppResult<Permission> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE permissions
            SET name = $2, description = $3
            WHERE id = $1
            "#,
        )
        .bind(permission_id.value())
        .bind(draft.name())
        .bind(draft.description())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            map_write_error(error, "update permission", || {
                format!("permission '{}' already exists", draft.name())
            })
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }

        Ok(Permission::new(permission_id, draft))
    }

    async fn delete_permission(&mut self, permission_id: PermissionId) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.value())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            map_write_error(error, "delete permission", || {
                format!("permission '{permission_id}' could not be deleted")
            })
        })?;

        Ok(())
    }
}
