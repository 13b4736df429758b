//! Tradegate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tradegate_application::AuthorizationGraphRepository;
use tradegate_core::AppError;
use tradegate_infrastructure::{MIGRATOR, PostgresAuthorizationGraphRepository};

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_router::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let repository: Arc<dyn AuthorizationGraphRepository> =
        Arc::new(PostgresAuthorizationGraphRepository::new(pool));
    let app_state = AppState::new(repository, config.fallback_role.clone());
    app_state.role_service.verify_fallback_role().await?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, fallback_role = %config.fallback_role.name(), "tradegate-api listening");

    axum::serve(listener, build_router(app_state))
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
