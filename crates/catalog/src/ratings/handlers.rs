use actix_web::{get, post, web, HttpResponse, Responder};
use cinelog_auth::AuthenticatedUser;
use cinelog_core::{CinelogError, Paginated, PaginationParams, Result};
use serde::Deserialize;
use uuid::Uuid;

use super::service::RatingService;

#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub score: i16,
    pub comment: Option<String>,
}

#[post("/api/v1/movies/{id}/ratings")]
pub async fn rate_movie(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<RateMovieRequest>,
    service: web::Data<RatingService>,
) -> Result<impl Responder> {
    let req = req.into_inner();
    let comment = req
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let outcome = service
        .upsert(user.user_id, path.into_inner(), req.score, comment)
        .await?;

    if outcome.created {
        Ok(HttpResponse::Created().json(outcome))
    } else {
        Ok(HttpResponse::Ok().json(outcome))
    }
}

#[get("/api/v1/movies/{id}/ratings")]
pub async fn movie_ratings(
    path: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
    service: web::Data<RatingService>,
) -> Result<impl Responder> {
    let movie_id = path.into_inner();
    let page = query.clamped();

    let (ratings, total) = service.list_for_movie(movie_id, page).await?;
    let distribution =
        super::service::country_distribution(service.pool(), movie_id).await?;

    let paginated = Paginated::new(ratings, page, total);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": paginated.items,
        "pagination": paginated.pagination,
        "distribution": distribution,
    })))
}

#[get("/api/v1/movies/{id}/ratings/me")]
pub async fn my_rating(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    service: web::Data<RatingService>,
) -> Result<impl Responder> {
    let rating = service
        .my_rating(path.into_inner(), user.user_id)
        .await?
        .ok_or(CinelogError::NotFound("rating"))?;

    Ok(HttpResponse::Ok().json(rating))
}

#[get("/api/v1/users/me/ratings")]
pub async fn user_ratings(
    user: AuthenticatedUser,
    query: web::Query<PaginationParams>,
    service: web::Data<RatingService>,
) -> Result<impl Responder> {
    let page = query.clamped();
    let (items, total) = service.list_for_user(user.user_id, page).await?;

    Ok(HttpResponse::Ok().json(Paginated::new(items, page, total)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(rate_movie)
        .service(my_rating)
        .service(movie_ratings)
        .service(user_ratings);
}
