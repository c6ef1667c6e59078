use actix_web::{get, post, web, HttpResponse, Responder};
use cinelog_auth::AuthenticatedUser;
use cinelog_core::{Paginated, PaginationParams, Result};
use uuid::Uuid;

use super::service::WatchlistService;

#[get("/api/v1/users/me/watchlist")]
pub async fn list_watchlist(
    user: AuthenticatedUser,
    query: web::Query<PaginationParams>,
    service: web::Data<WatchlistService>,
) -> Result<impl Responder> {
    let page = query.clamped();
    let (items, total) = service.list(user.user_id, page).await?;

    Ok(HttpResponse::Ok().json(Paginated::new(items, page, total)))
}

#[post("/api/v1/users/me/watchlist/{movie_id}")]
pub async fn toggle_watchlist(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    service: web::Data<WatchlistService>,
) -> Result<impl Responder> {
    let movie_id = path.into_inner();
    let result = service.toggle(user.user_id, movie_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "movie_id": movie_id,
        "status": result,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_watchlist).service(toggle_watchlist);
}
