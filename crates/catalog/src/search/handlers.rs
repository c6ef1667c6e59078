use actix_web::{get, web, HttpResponse, Responder};
use cinelog_core::Result;
use serde::Deserialize;

use super::service::{SearchMode, SearchService};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub mode: Option<String>,
}

#[get("/api/v1/search")]
pub async fn search(
    query: web::Query<SearchQuery>,
    service: web::Data<SearchService>,
) -> Result<impl Responder> {
    let term = query.q.as_deref().unwrap_or("");
    let mode = SearchMode::parse(query.mode.as_deref());

    let results = service.search(term, mode).await?;
    Ok(HttpResponse::Ok().json(results))
}

#[derive(Debug, Deserialize)]
pub struct TypeaheadQuery {
    pub q: Option<String>,
}

#[get("/api/v1/search/typeahead")]
pub async fn typeahead(
    query: web::Query<TypeaheadQuery>,
    service: web::Data<SearchService>,
) -> Result<impl Responder> {
    let suggestions = service.typeahead(query.q.as_deref().unwrap_or("")).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "items": suggestions })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(typeahead).service(search);
}
