//! Cinelog catalog services
//!
//! Movies and actors with their HTTP surface, rating upsert plus
//! average maintenance, watchlist toggling, the nightly popularity
//! scoring/ranking engine, and multi-mode search with typeahead.

pub mod actors;
pub mod movies;
pub mod popularity;
pub mod ratings;
pub mod search;
pub mod watchlist;

pub use popularity::{PopularityEngine, ScoringConfig};

use actix_web::web;

/// Register every catalog route on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Literal /movies/popular must register ahead of /movies/{id}.
    popularity::handlers::configure(cfg);
    movies::handlers::configure(cfg);
    actors::handlers::configure(cfg);
    ratings::handlers::configure(cfg);
    watchlist::handlers::configure(cfg);
    search::handlers::configure(cfg);
}
