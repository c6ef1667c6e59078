pub mod handlers;
pub mod service;

pub use service::{CreateMovieRequest, MovieDetail, MovieFilters, MovieService, MovieSort};
