use chrono::{DateTime, Utc};
use serde::Serialize;

use super::movie::MovieResponse;

/// Watchlist listing item: when it was added plus the movie it points
/// at. The row itself is just the `(user_id, movie_id)` key, so no
/// separate row struct is needed.
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistItem {
    pub added_at: DateTime<Utc>,
    pub movie: MovieResponse,
}
