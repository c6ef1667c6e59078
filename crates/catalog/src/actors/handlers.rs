use actix_web::{get, web, HttpResponse, Responder};
use cinelog_core::{Paginated, PaginationParams, Result};
use serde::Deserialize;
use uuid::Uuid;

use super::service::ActorService;

#[derive(Debug, Deserialize)]
pub struct ActorListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[get("/api/v1/actors")]
pub async fn list_actors(
    query: web::Query<ActorListQuery>,
    service: web::Data<ActorService>,
) -> Result<impl Responder> {
    let page = PaginationParams {
        page: query.page,
        size: query.size,
    }
    .clamped();
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

    let (actors, total) = service.list(search, page).await?;

    Ok(HttpResponse::Ok().json(Paginated::new(actors, page, total)))
}

#[get("/api/v1/actors/{id}")]
pub async fn get_actor(
    path: web::Path<Uuid>,
    service: web::Data<ActorService>,
) -> Result<impl Responder> {
    let detail = service.get_detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_actors).service(get_actor);
}
