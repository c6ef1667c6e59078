use actix_web::{get, post, web, HttpResponse, Responder};
use cinelog_auth::AuthenticatedUser;
use cinelog_core::{Paginated, PaginationParams, Result};
use serde::Deserialize;
use uuid::Uuid;

use super::service::{CreateMovieRequest, MovieFilters, MovieService, MovieSort};

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    pub search: Option<String>,
    pub year: Option<i16>,
    pub min_rating: Option<f64>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[get("/api/v1/movies")]
pub async fn list_movies(
    query: web::Query<MovieListQuery>,
    service: web::Data<MovieService>,
) -> Result<impl Responder> {
    let filters = MovieFilters {
        search: query.search.clone().filter(|s| !s.trim().is_empty()),
        year: query.year,
        min_rating: query.min_rating,
        sort: MovieSort::parse(query.sort.as_deref()),
    };
    let page = PaginationParams {
        page: query.page,
        size: query.size,
    }
    .clamped();

    let (items, total) = service.list(&filters, page).await?;

    Ok(HttpResponse::Ok().json(Paginated::new(items, page, total)))
}

#[get("/api/v1/movies/{id}")]
pub async fn get_movie(
    path: web::Path<Uuid>,
    service: web::Data<MovieService>,
) -> Result<impl Responder> {
    let detail = service.get_detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[post("/api/v1/movies")]
pub async fn create_movie(
    user: AuthenticatedUser,
    req: web::Json<CreateMovieRequest>,
    service: web::Data<MovieService>,
) -> Result<impl Responder> {
    let movie = service.create(&req).await?;

    tracing::info!(movie_id = %movie.id, created_by = %user.user_id, "Movie added to catalog");

    Ok(HttpResponse::Created().json(cinelog_core::models::MovieResponse::from(movie)))
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub limit: Option<i64>,
}

#[get("/api/v1/users/me/recommendations")]
pub async fn recommendations(
    user: AuthenticatedUser,
    query: web::Query<RecommendationsQuery>,
    service: web::Data<MovieService>,
) -> Result<impl Responder> {
    let limit = query.limit.unwrap_or(10).clamp(1, 50);
    let movies = service.recommendations(user.user_id, limit).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "items": movies })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_movies)
        .service(create_movie)
        .service(recommendations)
        .service(get_movie);
}
