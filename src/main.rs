use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use user_api::auth::{PasswordService, TokenService};
use user_api::config::AppConfig;
use user_api::users::{seed::seed_default_admin, MemoryUserStore, PgUserStore, UserStore};
use user_api::{create_router, db, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("user_api=debug,tower_http=info"));
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_level(true)
            .init();
    }

    tracing::info!("User API - Starting...");

    let config = AppConfig::from_env()?;

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    let passwords = PasswordService::new();
    if config.seed_admin {
        seed_default_admin(store.as_ref(), &passwords)
            .await
            .map_err(|e| format!("failed to seed default administrator: {:?}", e))?;
    }

    let tokens = TokenService::new(&config.jwt_secret, config.jwt_ttl_seconds());
    let app = create_router(AppState::new(store, passwords, tokens));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("User API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
