use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A rating row. One per `(movie_id, user_id)` pair, enforced by a
/// unique constraint; re-rating updates the row in place.
#[derive(Debug, Clone, FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub user_id: Uuid,
    pub score: i16,
    pub comment: Option<String>,
    pub voter_country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal voter info embedded in rating listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingUser {
    pub id: Uuid,
    pub full_name: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResponse {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub score: i16,
    pub comment: Option<String>,
    pub voter_country: String,
    pub created_at: DateTime<Utc>,
    pub user: Option<RatingUser>,
}

/// One row of the per-country vote breakdown for a movie.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CountryBreakdown {
    pub country: String,
    pub votes: i64,
    pub avg_score: f64,
}
