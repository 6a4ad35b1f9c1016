//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::error::ErrorBody;
use crate::api::handlers::{auth, health, users};
use crate::api::metrics::http_metrics_middleware;
use crate::application::dto::{RoleDto, UserDto};
use crate::application::services::UserService;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::auth::JwtConfig;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::get_current_user,
        // Users
        users::create_user,
        users::find_user_by_id,
        users::find_user_by_email,
        users::find_all_users,
        users::find_users_by_organization_id,
        users::find_users_by_role_id,
        users::find_users_by_comment_id,
        users::find_user_by_users_organizations_id,
        users::update_user,
        users::update_user_password,
        users::delete_user,
        users::activate_user,
        users::get_user_roles,
        users::set_user_roles,
    ),
    components(
        schemas(
            ErrorBody,
            UserDto,
            RoleDto,
            users::UpdatePasswordRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "User CRUD, activation, pagination and role assignment."),
        (name = "Authentication", description = "JWT login. The token is returned in the `token` field and sent back as `Authorization: Bearer <token>`."),
        (name = "Health", description = "Liveness probe for uptime monitoring."),
    ),
    info(
        title = "SmartCity User Service API",
        version = "1.0.0",
        description = "REST API for user management: CRUD, activation lifecycle, \
role assignment and organization lookups.

Errors are rendered uniformly as `{\"url\": <request path>, \"message\": <text>}` \
with 404 for missing entities, 400 for invalid arguments and 500 for \
persistence failures.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    service: Arc<UserService>,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let user_state = users::UserHandlerState {
        service: service.clone(),
    };

    // Collection-root routes. Registered at the parent level because axum 0.8
    // no longer matches a nested router's "/" route against the "/users/" path.
    let user_root_routes = Router::new()
        .route(
            "/users/",
            get(users::find_user_by_email).post(users::create_user),
        )
        .with_state(user_state.clone());

    let user_routes = Router::new()
        .route("/all/{page_id}", get(users::find_all_users))
        .route(
            "/organization/{organization_id}",
            get(users::find_users_by_organization_id),
        )
        .route("/role/{role_id}", get(users::find_users_by_role_id))
        .route("/comment/{comment_id}", get(users::find_users_by_comment_id))
        .route(
            "/users-organizations/{id}",
            get(users::find_user_by_users_organizations_id),
        )
        .route("/activate/{id}", post(users::activate_user))
        // Combine GET + PUT + DELETE on the same path in a single .route() call
        .route(
            "/{id}",
            get(users::find_user_by_id)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/get-roles", get(users::get_user_roles))
        .route("/{id}/set-roles", put(users::set_user_roles))
        .route("/{id}/update-password", put(users::update_user_password))
        .with_state(user_state);

    let auth_state = auth::AuthHandlerState {
        service,
        jwt_config: jwt_config.clone(),
    };

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .layer(middleware::from_fn_with_state(
            AuthState { jwt_config },
            auth_middleware,
        ))
        .with_state(auth_state);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Prometheus exposition
        .route(
            "/metrics",
            get(move || std::future::ready(prometheus_handle.render())),
        )
        // Users
        .merge(user_root_routes)
        .nest("/users", user_routes)
        // Auth
        .nest("/auth", auth_routes)
        .nest("/auth", auth_protected_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(http_metrics_middleware))
}
