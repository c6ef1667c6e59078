use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Utc;
use cinelog_auth::AuthenticatedUser;
use cinelog_core::Result;
use serde::Deserialize;
use uuid::Uuid;

use super::engine::PopularityEngine;

#[post("/api/v1/popularity/run")]
pub async fn run_pass(
    user: AuthenticatedUser,
    engine: web::Data<PopularityEngine>,
) -> Result<impl Responder> {
    let as_of = Utc::now().date_naive();
    tracing::info!(triggered_by = %user.user_id, %as_of, "Popularity pass triggered");

    let summary = engine.run_nightly_pass(as_of).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/api/v1/movies/{id}/popularity")]
pub async fn movie_popularity(
    path: web::Path<Uuid>,
    engine: web::Data<PopularityEngine>,
) -> Result<impl Responder> {
    let snapshot = engine.latest_snapshot(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<i64>,
}

#[get("/api/v1/movies/popular")]
pub async fn popular_movies(
    query: web::Query<PopularQuery>,
    engine: web::Data<PopularityEngine>,
) -> Result<impl Responder> {
    let limit = query.limit.unwrap_or(20).clamp(1, 50);
    let movies = engine.popular(limit).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "items": movies })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(run_pass)
        .service(popular_movies)
        .service(movie_popularity);
}
