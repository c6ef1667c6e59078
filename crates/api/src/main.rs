use cinelog_api::server::start_server;
use cinelog_auth::{GoogleOAuthProvider, JwtManager, OAuthStateStore, PostgresUserRepository};
use cinelog_catalog::{PopularityEngine, ScoringConfig};
use cinelog_core::{load_dotenv, DatabaseConfig, DatabasePool, ServiceConfig};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Cinelog API");

    let service_config = ServiceConfig::from_env()
        .and_then(|c| c.validate().map(|_| c))
        .unwrap_or_else(|e| {
            tracing::error!("Invalid service configuration: {}", e);
            std::process::exit(1);
        });
    let database_config = DatabaseConfig::from_env()
        .and_then(|c| c.validate().map(|_| c))
        .unwrap_or_else(|e| {
            tracing::error!("Invalid database configuration: {}", e);
            std::process::exit(1);
        });

    let database = DatabasePool::new(&database_config).await.unwrap_or_else(|e| {
        tracing::error!("Failed to connect to database: {}", e);
        std::process::exit(1);
    });

    sqlx::migrate!("../../migrations")
        .run(database.pool())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Migrations failed: {}", e);
            std::process::exit(1);
        });

    let jwt_manager = Arc::new(JwtManager::from_env().unwrap_or_else(|e| {
        tracing::error!("JWT configuration error: {}", e);
        std::process::exit(1);
    }));

    let user_repository = Arc::new(PostgresUserRepository::new(database.pool().clone()));
    let oauth_states = Arc::new(OAuthStateStore::new());

    let google_provider = match GoogleOAuthProvider::from_env() {
        Ok(provider) => {
            tracing::info!("Google sign-in configured");
            Some(Arc::new(provider))
        }
        Err(_) => {
            tracing::warn!("Google sign-in not configured, routes will reject");
            None
        }
    };

    let popularity_engine =
        PopularityEngine::new(database.pool().clone(), ScoringConfig::default());

    start_server(
        service_config,
        database,
        jwt_manager,
        user_repository,
        oauth_states,
        google_provider,
        popularity_engine,
    )
    .await
}
