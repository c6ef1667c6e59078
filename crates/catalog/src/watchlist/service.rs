use cinelog_core::models::{MovieResponse, WatchlistItem};
use cinelog_core::{CinelogError, Page, Result};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleResult {
    Added,
    Removed,
}

#[derive(Clone)]
pub struct WatchlistService {
    pool: PgPool,
}

impl WatchlistService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add the movie if absent, remove it if present. The composite
    /// primary key makes concurrent toggles settle on one of the two
    /// states instead of erroring.
    pub async fn toggle(&self, user_id: Uuid, movie_id: Uuid) -> Result<ToggleResult> {
        let movie_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
                .bind(movie_id)
                .fetch_one(&self.pool)
                .await?;
        if !movie_exists {
            return Err(CinelogError::NotFound("movie"));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO watchlist (user_id, movie_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, movie_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            tracing::info!(user_id = %user_id, movie_id = %movie_id, "Watchlist add");
            return Ok(ToggleResult::Added);
        }

        sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = %user_id, movie_id = %movie_id, "Watchlist remove");
        Ok(ToggleResult::Removed)
    }

    pub async fn list(&self, user_id: Uuid, page: Page) -> Result<(Vec<WatchlistItem>, i64)> {
        let rows = sqlx::query(
            r#"
            SELECT w.added_at,
                   m.id, m.title, m.original_title, m.year, m.summary,
                   m.average_rating, m.metascore, m.trailer_url, m.image_url,
                   m.runtime_min, m.release_date, m.language
            FROM watchlist w
            JOIN movies m ON m.id = w.movie_id
            WHERE w.user_id = $1
            ORDER BY w.added_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(WatchlistItem {
                added_at: row.try_get("added_at")?,
                movie: MovieResponse {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    original_title: row.try_get("original_title")?,
                    year: row.try_get("year")?,
                    summary: row.try_get("summary")?,
                    average_rating: row.try_get("average_rating")?,
                    metascore: row.try_get("metascore")?,
                    trailer_url: row.try_get("trailer_url")?,
                    image_url: row.try_get("image_url")?,
                    runtime_min: row.try_get("runtime_min")?,
                    release_date: row.try_get("release_date")?,
                    language: row.try_get("language")?,
                },
            });
        }

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM watchlist WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }
}
