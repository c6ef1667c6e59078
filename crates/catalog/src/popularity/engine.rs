use async_trait::async_trait;
use chrono::NaiveDate;
use cinelog_core::models::PopularitySnapshot;
use cinelog_core::{CinelogError, Result};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Weights and windows for the popularity formula. Passed in rather
/// than hard-coded so tests can override individual weights.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub rating_weight: f64,
    pub comment_weight: f64,
    pub view_weight: f64,
    pub watchlist_weight: f64,
    pub recent_window_days: i32,
    pub view_multiplier: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rating_weight: 0.5,
            comment_weight: 0.2,
            view_weight: 0.2,
            watchlist_weight: 0.1,
            recent_window_days: 7,
            view_multiplier: 5,
        }
    }
}

/// Raw engagement numbers for one movie.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementSignals {
    pub average_rating: f64,
    pub comment_count: i64,
    pub watchlist_adds_7d: i64,
    pub page_views_7d: i64,
}

/// Popularity score for one movie, rounded to 2 decimals.
///
/// Log-damped so a hundred comments does not drown out ratings, and
/// monotone non-decreasing in every signal. A movie with no
/// engagement at all scores exactly 0.0.
pub fn score(signals: &EngagementSignals, config: &ScoringConfig) -> f64 {
    let raw = config.rating_weight * (signals.average_rating / 10.0)
        + config.comment_weight * ((signals.comment_count + 1) as f64).log10()
        + config.view_weight * ((signals.page_views_7d + 1) as f64).log10()
        + config.watchlist_weight * ((signals.watchlist_adds_7d + 1) as f64).log10();

    (raw * 100.0).round() / 100.0
}

/// Assign 1-based ranks by score descending. Equal scores are ordered
/// by movie id ascending so reruns produce identical ranks. Errors if
/// a rank would not fit the smallint column.
pub fn assign_ranks(mut scored: Vec<(Uuid, f64)>) -> Result<Vec<(Uuid, i16)>> {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
        .into_iter()
        .enumerate()
        .map(|(i, (movie_id, _))| {
            let rank = i16::try_from(i + 1).map_err(|_| {
                CinelogError::Internal("popularity rank exceeds smallint range".to_string())
            })?;
            Ok((movie_id, rank))
        })
        .collect()
}

/// Where page-view counts come from.
#[async_trait]
pub trait PageViewSource: Send + Sync {
    async fn page_views(&self, movie_id: Uuid, window_days: i32) -> Result<i64>;
}

/// Stand-in view source until an analytics pipeline exists:
/// approximates page views as a multiple of the movie's comment
/// count.
pub struct CommentProxyViews {
    pool: PgPool,
    multiplier: i64,
}

impl CommentProxyViews {
    pub fn new(pool: PgPool, multiplier: i64) -> Self {
        Self { pool, multiplier }
    }
}

#[async_trait]
impl PageViewSource for CommentProxyViews {
    async fn page_views(&self, movie_id: Uuid, _window_days: i32) -> Result<i64> {
        let comments: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM ratings
            WHERE movie_id = $1 AND comment IS NOT NULL AND btrim(comment) <> ''
            "#,
        )
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comments * self.multiplier)
    }
}

#[derive(Debug, Serialize)]
pub struct PassSummary {
    pub snapshot_date: NaiveDate,
    pub movies_scored: i64,
    pub failures: i64,
}

#[derive(Clone)]
pub struct PopularityEngine {
    pool: PgPool,
    views: Arc<dyn PageViewSource>,
    config: ScoringConfig,
}

impl PopularityEngine {
    pub fn new(pool: PgPool, config: ScoringConfig) -> Self {
        let views = Arc::new(CommentProxyViews::new(pool.clone(), config.view_multiplier));
        Self { pool, views, config }
    }

    pub fn with_view_source(mut self, views: Arc<dyn PageViewSource>) -> Self {
        self.views = views;
        self
    }

    async fn gather_signals(&self, movie_id: Uuid) -> Result<EngagementSignals> {
        let row: (f64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COALESCE(AVG(score)::double precision, 0)
                   FROM ratings WHERE movie_id = $1),
                (SELECT COUNT(*) FROM ratings
                  WHERE movie_id = $1 AND comment IS NOT NULL AND btrim(comment) <> ''),
                (SELECT COUNT(*) FROM watchlist
                  WHERE movie_id = $1
                    AND added_at >= NOW() - make_interval(days => $2))
            "#,
        )
        .bind(movie_id)
        .bind(self.config.recent_window_days)
        .fetch_one(&self.pool)
        .await?;

        let page_views_7d = self
            .views
            .page_views(movie_id, self.config.recent_window_days)
            .await?;

        Ok(EngagementSignals {
            average_rating: row.0,
            comment_count: row.1,
            watchlist_adds_7d: row.2,
            page_views_7d,
        })
    }

    /// Current score for one movie, computed on the fly.
    pub async fn compute_score(&self, movie_id: Uuid) -> Result<f64> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
            .bind(movie_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(CinelogError::NotFound("movie"));
        }

        let signals = self.gather_signals(movie_id).await?;
        Ok(score(&signals, &self.config))
    }

    /// Score every movie and persist one ranked snapshot row per
    /// movie for `as_of`.
    ///
    /// A movie whose signals cannot be gathered is logged and scored
    /// 0.0 so one bad row never kills the batch. All snapshot writes
    /// and rank updates happen in a single transaction; rerunning for
    /// the same date overwrites that date's snapshots in place.
    pub async fn run_nightly_pass(&self, as_of: NaiveDate) -> Result<PassSummary> {
        let movie_ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM movies ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut failures = 0i64;
        let mut scored: Vec<(Uuid, f64)> = Vec::with_capacity(movie_ids.len());
        for movie_id in movie_ids {
            let movie_score = match self.gather_signals(movie_id).await {
                Ok(signals) => score(&signals, &self.config),
                Err(err) => {
                    tracing::warn!(
                        movie_id = %movie_id,
                        error = %err,
                        "Scoring failed, defaulting to 0.0"
                    );
                    failures += 1;
                    0.0
                }
            };
            scored.push((movie_id, movie_score));
        }

        let mut tx = self.pool.begin().await?;

        for (movie_id, movie_score) in &scored {
            sqlx::query(
                r#"
                INSERT INTO popularity_snapshots (movie_id, snapshot_date, score, rank)
                VALUES ($1, $2, $3, NULL)
                ON CONFLICT (movie_id, snapshot_date) DO UPDATE
                SET score = EXCLUDED.score, rank = NULL
                "#,
            )
            .bind(movie_id)
            .bind(as_of)
            .bind(movie_score)
            .execute(&mut *tx)
            .await?;
        }

        // Rank over everything snapshotted for the day, not just the
        // movies scored above, so reruns stay consistent.
        let day_scores: Vec<(Uuid, f64)> = sqlx::query_as(
            "SELECT movie_id, score FROM popularity_snapshots WHERE snapshot_date = $1",
        )
        .bind(as_of)
        .fetch_all(&mut *tx)
        .await?;

        let movies_scored = day_scores.len() as i64;
        for (movie_id, rank) in assign_ranks(day_scores)? {
            sqlx::query(
                r#"
                UPDATE popularity_snapshots
                SET rank = $1
                WHERE movie_id = $2 AND snapshot_date = $3
                "#,
            )
            .bind(rank)
            .bind(movie_id)
            .bind(as_of)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            snapshot_date = %as_of,
            movies_scored,
            failures,
            "Popularity pass complete"
        );

        Ok(PassSummary {
            snapshot_date: as_of,
            movies_scored,
            failures,
        })
    }

    /// Most recent snapshot for one movie.
    pub async fn latest_snapshot(&self, movie_id: Uuid) -> Result<PopularitySnapshot> {
        sqlx::query_as::<_, PopularitySnapshot>(
            r#"
            SELECT movie_id, snapshot_date, score, rank
            FROM popularity_snapshots
            WHERE movie_id = $1
            ORDER BY snapshot_date DESC
            LIMIT 1
            "#,
        )
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CinelogError::NotFound("popularity snapshot"))
    }
}

/// A movie on the popular chart.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PopularMovie {
    pub movie_id: Uuid,
    pub title: String,
    pub year: i16,
    pub image_url: Option<String>,
    pub average_rating: f64,
    pub snapshot_date: NaiveDate,
    pub score: f64,
    pub rank: Option<i16>,
}

impl PopularityEngine {
    /// Top movies from the most recent snapshot date.
    pub async fn popular(&self, limit: i64) -> Result<Vec<PopularMovie>> {
        let movies = sqlx::query_as::<_, PopularMovie>(
            r#"
            SELECT ps.movie_id, m.title, m.year, m.image_url, m.average_rating,
                   ps.snapshot_date, ps.score, ps.rank
            FROM popularity_snapshots ps
            JOIN movies m ON m.id = ps.movie_id
            WHERE ps.snapshot_date = (SELECT MAX(snapshot_date) FROM popularity_snapshots)
            ORDER BY ps.score DESC, ps.movie_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(avg: f64, comments: i64, watchlist: i64, views: i64) -> EngagementSignals {
        EngagementSignals {
            average_rating: avg,
            comment_count: comments,
            watchlist_adds_7d: watchlist,
            page_views_7d: views,
        }
    }

    #[test]
    fn test_zero_engagement_scores_zero() {
        let config = ScoringConfig::default();
        assert_eq!(score(&signals(0.0, 0, 0, 0), &config), 0.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let config = ScoringConfig::default();
        let total = config.rating_weight
            + config.comment_weight
            + config.view_weight
            + config.watchlist_weight;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_monotone_in_each_signal() {
        let config = ScoringConfig::default();
        let base = signals(5.0, 10, 10, 50);
        let base_score = score(&base, &config);

        assert!(score(&signals(9.0, 10, 10, 50), &config) >= base_score);
        assert!(score(&signals(5.0, 100, 10, 50), &config) >= base_score);
        assert!(score(&signals(5.0, 10, 100, 50), &config) >= base_score);
        assert!(score(&signals(5.0, 10, 10, 500), &config) >= base_score);
    }

    #[test]
    fn test_score_rounded_to_two_decimals() {
        let config = ScoringConfig::default();
        let s = score(&signals(7.3, 4, 2, 20), &config);
        assert_eq!((s * 100.0).round() / 100.0, s);
    }

    #[test]
    fn test_perfect_rating_alone() {
        let config = ScoringConfig::default();
        // 0.5 * (10/10) with every other signal empty.
        assert_eq!(score(&signals(10.0, 0, 0, 0), &config), 0.5);
    }

    #[test]
    fn test_assign_ranks_with_ties() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        let d = Uuid::from_u128(4);

        let ranks = assign_ranks(vec![(a, 8.5), (b, 3.2), (c, 8.5), (d, 1.0)]).unwrap();

        // Tied 8.5s order by id ascending.
        assert_eq!(ranks[0], (a, 1));
        assert_eq!(ranks[1], (c, 2));
        assert_eq!(ranks[2], (b, 3));
        assert_eq!(ranks[3], (d, 4));
    }

    #[test]
    fn test_assign_ranks_deterministic_on_rerun() {
        let ids: Vec<Uuid> = (0..6u128).map(Uuid::from_u128).collect();
        let scored: Vec<(Uuid, f64)> = ids.iter().map(|id| (*id, 4.2)).collect();

        let first = assign_ranks(scored.clone()).unwrap();
        let second = assign_ranks(scored).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assign_ranks_empty() {
        assert!(assign_ranks(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_assign_ranks_past_smallint_errors() {
        let scored: Vec<(Uuid, f64)> = (0..i16::MAX as u128 + 2)
            .map(|i| (Uuid::from_u128(i), 1.0))
            .collect();
        assert!(assign_ranks(scored).is_err());
    }
}
