//! Domain models and response DTOs
//!
//! Row structs derive `sqlx::FromRow` and map 1:1 onto the tables in
//! `migrations/`; `*Response` types are the JSON shapes handlers
//! return (never exposing internals such as password hashes).

pub mod actor;
pub mod movie;
pub mod rating;
pub mod snapshot;
pub mod user;
pub mod watchlist;

pub use actor::{Actor, ActorCredit, ActorResponse};
pub use movie::{Movie, MovieResponse};
pub use rating::{CountryBreakdown, Rating, RatingResponse, RatingUser};
pub use snapshot::PopularitySnapshot;
pub use user::{User, UserResponse, PROVIDER_GOOGLE, PROVIDER_LOCAL};
pub use watchlist::WatchlistItem;
