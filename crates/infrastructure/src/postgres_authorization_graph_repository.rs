use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use tradegate_application::{
    AuthorizationGraphRepository, AuthorizationGraphUnitOfWork, UserStore,
};
use tradegate_core::{AppError, AppResult};
use tradegate_domain::{
    Permission, PermissionDraft, PermissionId, Role, RoleDraft, RoleId, RolePermission,
    RolePermissionId, UserId, UserRole, UserRoleId,
};

mod links;
mod permissions;
mod roles;

/// Embedded schema migrations for the authorization graph tables.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL-backed repository for the authorization graph.
#[derive(Clone)]
pub struct PostgresAuthorizationGraphRepository {
    pool: PgPool,
}

impl PostgresAuthorizationGraphRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationGraphRepository for PostgresAuthorizationGraphRepository {
    async fn begin(&self) -> AppResult<Box<dyn AuthorizationGraphUnitOfWork>> {
        let transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        Ok(Box::new(PostgresAuthorizationGraphUnitOfWork { transaction }))
    }
}

/// Unit of work wrapping one PostgreSQL transaction.
///
/// Dropping it without committing rolls the transaction back.
pub struct PostgresAuthorizationGraphUnitOfWork {
    transaction: Transaction<'static, Postgres>,
}

#[async_trait]
impl AuthorizationGraphUnitOfWork for PostgresAuthorizationGraphUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })
    }
}

#[async_trait]
impl UserStore for PostgresAuthorizationGraphUnitOfWork {
    async fn lock_user(&mut self, user_id: UserId) -> AppResult<bool> {
        let locked = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock user: {error}")))?;

        Ok(locked.is_some())
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: i64,
    name: String,
    description: Option<String>,
}

impl PermissionRow {
    fn into_permission(self) -> AppResult<Permission> {
        let id = self.id;
        let draft = PermissionDraft::new(self.name, self.description).map_err(|error| {
            AppError::Internal(format!("invalid stored permission '{id}': {error}"))
        })?;

        Ok(Permission::new(PermissionId::new(id), draft))
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    description: Option<String>,
}

impl RoleRow {
    fn into_role(self) -> AppResult<Role> {
        let id = self.id;
        let draft = RoleDraft::new(self.name, self.description)
            .map_err(|error| AppError::Internal(format!("invalid stored role '{id}': {error}")))?;

        Ok(Role::new(RoleId::new(id), draft))
    }
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    id: i64,
    role_id: i64,
    permission_id: i64,
}

impl From<RolePermissionRow> for RolePermission {
    fn from(row: RolePermissionRow) -> Self {
        Self {
            id: RolePermissionId::new(row.id),
            role_id: RoleId::new(row.role_id),
            permission_id: PermissionId::new(row.permission_id),
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRoleRow {
    id: i64,
    user_id: i64,
    role_id: i64,
}

impl From<UserRoleRow> for UserRole {
    fn from(row: UserRoleRow) -> Self {
        Self {
            id: UserRoleId::new(row.id),
            user_id: UserId::new(row.user_id),
            role_id: RoleId::new(row.role_id),
        }
    }
}

fn map_write_error(
    error: sqlx::Error,
    operation: &str,
    conflict: impl FnOnce() -> String,
) -> AppError {
    if let sqlx::Error::Database(database_error) = &error {
        match database_error.code().as_deref() {
            Some("23505") => return AppError::Conflict(conflict()),
            Some("23503") => {
                return AppError::Conflict(format!(
                    "failed to {operation}: foreign key violation"
                ));
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
