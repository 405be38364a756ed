pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod navigation;
pub mod users;
pub mod validation;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, PasswordService, TokenService};
use users::{UserService, UserStore};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::login_handler,
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::create_user,
        users::handlers::update_user,
        users::handlers::delete_user,
        users::handlers::change_password,
    ),
    components(schemas(
        auth::models::LoginRequest,
        auth::models::LoginResponse,
        users::models::UserResponse,
        users::models::CreateUserRequest,
        users::models::UpdateUserRequest,
        users::models::ChangePasswordRequest,
        users::models::UserListResponse,
        users::models::UserEnvelope,
        users::models::MessageResponse,
        error::ValidationErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "User account management")
    ),
    info(
        title = "User API",
        version = "0.1.0",
        description = "Authenticated CRUD API for user accounts"
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub auth_service: AuthService,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        passwords: PasswordService,
        token_service: TokenService,
    ) -> Self {
        let token_service = Arc::new(token_service);
        Self {
            user_service: UserService::new(store.clone(), passwords.clone()),
            auth_service: AuthService::new(store, passwords, token_service.clone()),
            token_service,
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Creates and configures the application router
///
/// Every /api/users route is wrapped by the auth gate; login, health and
/// the API docs are public.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route(
            "/api/users",
            get(users::handlers::list_users).post(users::handlers::create_user),
        )
        .route(
            "/api/users/:id",
            get(users::handlers::get_user)
                .put(users::handlers::update_user)
                .delete(users::handlers::delete_user),
        )
        .route(
            "/api/users/:id/change-password",
            post(users::handlers::change_password),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .route("/api/login", post(auth::login_handler))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
