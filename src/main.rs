mod audit;
mod auth;
mod config;
mod db;
mod invites;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    handlers::{invite_handler, login_handler, me_handler, refresh_handler, register_handler},
    middleware::{authenticate, RequireRole},
    repository::UserRepository,
    service::AuthService,
    token::TokenService,
};
use config::Config;
use invites::{repository::InviteRepository, service::InviteService};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::login_handler,
        auth::handlers::invite_handler,
        auth::handlers::register_handler,
        auth::handlers::refresh_handler,
        auth::handlers::me_handler,
    ),
    components(
        schemas(
            auth::models::LoginRequest,
            auth::models::RegisterViaInviteRequest,
            auth::models::RefreshRequest,
            auth::models::AuthResponse,
            auth::models::TokenPairResponse,
            auth::models::UserResponse,
            auth::models::Role,
            auth::models::UserStatus,
            invites::models::CreateInviteRequest,
            invites::models::InviteResponse,
        )
    ),
    tags(
        (name = "auth", description = "Authentication and invite endpoints")
    ),
    info(
        title = "TeamHub API",
        version = "1.0.0",
        description = "Invite-based authentication backend with role-based access control"
    )
)]
struct ApiDoc;

/// Application state shared across handlers and middleware
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub token_service: Arc<TokenService>,
    pub user_repo: UserRepository,
    pub auth_service: AuthService,
    pub invite_service: InviteService,
}

impl AppState {
    /// Wire repositories and services from a pool and configuration.
    /// Every component takes its dependencies explicitly; there is no
    /// process-global store handle.
    pub fn new(db: PgPool, config: &Config) -> Self {
        let token_service = Arc::new(TokenService::new(
            config.jwt_secret.clone(),
            config.jwt_refresh_secret.clone(),
            config.access_token_seconds,
            config.refresh_token_seconds,
        ));
        let user_repo = UserRepository::new(db.clone());
        let invite_repo = InviteRepository::new(db.clone());
        let invite_service = InviteService::new(
            invite_repo,
            user_repo.clone(),
            config.invite_expires_hours,
        );
        let auth_service = AuthService::new(
            user_repo.clone(),
            invite_service.clone(),
            token_service.clone(),
        );

        Self {
            db,
            token_service,
            user_repo,
            auth_service,
            invite_service,
        }
    }
}

/// Creates and configures the application router
///
/// Public routes: login, register, refresh. The invite route sits behind
/// authenticate + admin gate; /me behind authenticate alone.
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/refresh", post(refresh_handler));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(me_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Layers run outside-in: authenticate first, then the role gate
    let admin_routes = Router::new()
        .route("/api/auth/invite", post(invite_handler))
        .route_layer(middleware::from_fn(
            |request: axum::extract::Request, next: middleware::Next| {
                RequireRole::admin().middleware(request, next)
            },
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("TeamHub API - Starting...");

    let config = Config::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(AppState::new(db_pool, &config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("TeamHub API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
