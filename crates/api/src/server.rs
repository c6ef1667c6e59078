use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use cinelog_auth::{GoogleOAuthProvider, JwtManager, OAuthStateStore, PostgresUserRepository};
use cinelog_catalog::{
    actors::ActorService, movies::MovieService, ratings::RatingService, search::SearchService,
    watchlist::WatchlistService, PopularityEngine,
};
use cinelog_core::{DatabasePool, ServiceConfig};
use std::sync::Arc;

// ============================================================================
// Health Check
// ============================================================================

#[get("/api/v1/health")]
async fn health_check(database: web::Data<DatabasePool>) -> impl Responder {
    let db_healthy = database.is_healthy().await;
    let status = if db_healthy { "healthy" } else { "degraded" };

    let body = serde_json::json!({
        "status": status,
        "service": "cinelog-api",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
    });

    if db_healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

/// Assemble the app and run until shutdown.
pub async fn start_server(
    service_config: ServiceConfig,
    database: DatabasePool,
    jwt_manager: Arc<JwtManager>,
    user_repository: Arc<PostgresUserRepository>,
    oauth_states: Arc<OAuthStateStore>,
    google_provider: Option<Arc<GoogleOAuthProvider>>,
    popularity_engine: PopularityEngine,
) -> std::io::Result<()> {
    let pool = database.pool().clone();

    let movie_service = MovieService::new(pool.clone());
    let actor_service = ActorService::new(pool.clone());
    let rating_service = RatingService::new(pool.clone());
    let watchlist_service = WatchlistService::new(pool.clone());
    let search_service = SearchService::new(pool);

    let bind_address = service_config.bind_address.clone();
    tracing::info!(%bind_address, "Cinelog API listening");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service_config.clone()))
            .app_data(web::Data::new(database.clone()))
            .app_data(web::Data::new(jwt_manager.clone()))
            .app_data(web::Data::new(user_repository.clone()))
            .app_data(web::Data::new(oauth_states.clone()))
            .app_data(web::Data::new(google_provider.clone()))
            .app_data(web::Data::new(movie_service.clone()))
            .app_data(web::Data::new(actor_service.clone()))
            .app_data(web::Data::new(rating_service.clone()))
            .app_data(web::Data::new(watchlist_service.clone()))
            .app_data(web::Data::new(search_service.clone()))
            .app_data(web::Data::new(popularity_engine.clone()))
            .service(health_check)
            .configure(cinelog_auth::handlers::configure)
            .configure(cinelog_catalog::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
