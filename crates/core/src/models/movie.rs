use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A movie row as stored in the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub original_title: Option<String>,
    pub year: i16,
    pub summary: Option<String>,
    pub average_rating: f64,
    pub metascore: Option<i16>,
    pub trailer_url: Option<String>,
    pub image_url: Option<String>,
    pub runtime_min: Option<i16>,
    pub release_date: Option<NaiveDate>,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JSON shape shared by list items and detail responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub original_title: Option<String>,
    pub year: i16,
    pub summary: Option<String>,
    pub average_rating: f64,
    pub metascore: Option<i16>,
    pub trailer_url: Option<String>,
    pub image_url: Option<String>,
    pub runtime_min: Option<i16>,
    pub release_date: Option<NaiveDate>,
    pub language: Option<String>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            original_title: movie.original_title,
            year: movie.year,
            summary: movie.summary,
            average_rating: movie.average_rating,
            metascore: movie.metascore,
            trailer_url: movie.trailer_url,
            image_url: movie.image_url,
            runtime_min: movie.runtime_min,
            release_date: movie.release_date,
            language: movie.language,
        }
    }
}
