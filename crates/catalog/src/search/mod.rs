pub mod handlers;
pub mod service;

pub use service::{SearchMode, SearchResults, SearchService, Suggestion};
