use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Nightly popularity snapshot for one movie. `rank` is assigned in a
/// second pass once every score for the day is known, so it is nullable
/// at the storage level even though the nightly job always fills it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PopularitySnapshot {
    pub movie_id: Uuid,
    pub snapshot_date: NaiveDate,
    pub score: f64,
    pub rank: Option<i16>,
}
