use tradegate_application::RoleStore;

use super::*;

#[async_trait]
impl RoleStore for PostgresAuthorizationGraphUnitOfWork {
    async fn find_role(&mut self, role_id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.value())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?
        .map(RoleRow::into_role)
        .transpose()
    }

    async fn find_role_by_name(&mut self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?
        .map(RoleRow::into_role)
        .transpose()
    }

    async fn find_roles_by_ids(&mut self, role_ids: &[RoleId]) -> AppResult<Vec<Role>> {
        let ids = role_ids.iter().map(RoleId::value).collect::<Vec<_>>();

        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description
            FROM roles
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve roles: {error}")))?
        .into_iter()
        .map(RoleRow::into_role)
        .collect()
    }

    async fn list_roles(&mut self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?
        .into_iter()
        .map(RoleRow::into_role)
        .collect()
    }

    async fn insert_role(&mut self, draft: RoleDraft) -> AppResult<Role> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO roles (name, description)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(draft.name())
        .bind(draft.description())
        .fetch_one(&mut *self.transaction)
        .await
        .map_err(|error| {
            map_write_error(error, "create role", || {
                format!("role '{}' already exists", draft.name())
            })
        })?;

        Ok(Role::new(RoleId::new(id), draft))
    }

    async fn update_role(&mut self, role_id: RoleId, draft: RoleDraft) -> AppResult<Role> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE roles
            SET name = $2, description = $3
            WHERE id = $1
            "#,
        )
        .bind(role_id.value())
        .bind(draft.name())
        .bind(draft.description())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            map_write_error(error, "update role", || {
                format!("role '{}' already exists", draft.name())
            })
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(Role::new(role_id, draft))
    }

    async fn delete_role(&mut self, role_id: RoleId) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.value())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            map_write_error(error, "delete role", || {
                format!("role '{role_id}' could not be deleted")
            })
        })?;

        Ok(())
    }
}
