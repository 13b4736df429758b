use axum::Router;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(app_state: AppState) -> Router {
    let authorization_routes = Router::new()
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .put(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            get(handlers::roles::list_role_permissions_handler)
                .put(handlers::roles::replace_role_permissions_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::permissions::list_permissions_handler)
                .post(handlers::permissions::create_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            put(handlers::permissions::update_permission_handler)
                .delete(handlers::permissions::delete_permission_handler),
        )
        .route(
            "/api/users/{user_id}/roles",
            get(handlers::users::list_user_roles_handler)
                .put(handlers::users::update_user_roles_handler),
        );

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(authorization_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
