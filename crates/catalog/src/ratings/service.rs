use chrono::{DateTime, Utc};
use cinelog_core::models::{CountryBreakdown, MovieResponse, Rating, RatingResponse, RatingUser};
use cinelog_core::validation;
use cinelog_core::{CinelogError, Page, Result};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct UpsertOutcome {
    pub rating: RatingResponse,
    pub created: bool,
    pub new_average: f64,
}

/// A rating the user gave, with the rated movie embedded.
#[derive(Debug, Serialize)]
pub struct UserRatingItem {
    pub id: Uuid,
    pub score: i16,
    pub comment: Option<String>,
    pub voter_country: String,
    pub created_at: DateTime<Utc>,
    pub movie: MovieResponse,
}

#[derive(Clone)]
pub struct RatingService {
    pool: PgPool,
}

impl RatingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// One rating per user per movie. A second submission overwrites
    /// the first; the unique constraint makes concurrent submits
    /// collapse into insert-then-update.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: i16,
        comment: Option<String>,
    ) -> Result<UpsertOutcome> {
        validation::validate_rating(score)?;

        let movie_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
                .bind(movie_id)
                .fetch_one(&self.pool)
                .await?;
        if !movie_exists {
            return Err(CinelogError::NotFound("movie"));
        }

        let country: Option<Option<String>> =
            sqlx::query_scalar("SELECT country FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        let voter_country = match country {
            Some(country) => country.unwrap_or_else(|| "US".to_string()),
            None => return Err(CinelogError::NotFound("user")),
        };

        // Existence probe only decides created-vs-updated for the
        // response; the write itself is the atomic upsert below.
        let existed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM ratings WHERE movie_id = $1 AND user_id = $2)",
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let rating = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (movie_id, user_id, score, comment, voter_country)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (movie_id, user_id) DO UPDATE
            SET score = EXCLUDED.score,
                comment = EXCLUDED.comment,
                voter_country = EXCLUDED.voter_country,
                updated_at = NOW()
            RETURNING id, movie_id, user_id, score, comment, voter_country,
                      created_at, updated_at
            "#,
        )
        .bind(movie_id)
        .bind(user_id)
        .bind(score)
        .bind(comment)
        .bind(&voter_country)
        .fetch_one(&self.pool)
        .await?;

        let new_average = self.recompute_average(movie_id).await?;

        tracing::info!(
            movie_id = %movie_id,
            user_id = %user_id,
            score,
            created = !existed,
            new_average,
            "Rating recorded"
        );

        Ok(UpsertOutcome {
            rating: RatingResponse {
                id: rating.id,
                movie_id: rating.movie_id,
                score: rating.score,
                comment: rating.comment,
                voter_country: rating.voter_country,
                created_at: rating.created_at,
                user: None,
            },
            created: !existed,
            new_average,
        })
    }

    /// Recompute and persist the movie's cached average.
    pub async fn recompute_average(&self, movie_id: Uuid) -> Result<f64> {
        let scores: Vec<i16> =
            sqlx::query_scalar("SELECT score FROM ratings WHERE movie_id = $1")
                .bind(movie_id)
                .fetch_all(&self.pool)
                .await?;

        let average = cached_average(&scores);

        let updated = sqlx::query(
            "UPDATE movies SET average_rating = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(average)
        .bind(movie_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(CinelogError::NotFound("movie"));
        }

        Ok(average)
    }

    pub async fn list_for_movie(
        &self,
        movie_id: Uuid,
        page: Page,
    ) -> Result<(Vec<RatingResponse>, i64)> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.movie_id, r.score, r.comment, r.voter_country, r.created_at,
                   u.id AS user_id, u.full_name, u.country
            FROM ratings r
            JOIN users u ON u.id = r.user_id
            WHERE r.movie_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(movie_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let mut ratings = Vec::with_capacity(rows.len());
        for row in rows {
            ratings.push(RatingResponse {
                id: row.try_get("id")?,
                movie_id: row.try_get("movie_id")?,
                score: row.try_get("score")?,
                comment: row.try_get("comment")?,
                voter_country: row.try_get("voter_country")?,
                created_at: row.try_get("created_at")?,
                user: Some(RatingUser {
                    id: row.try_get("user_id")?,
                    full_name: row.try_get("full_name")?,
                    country: row.try_get("country")?,
                }),
            });
        }

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE movie_id = $1")
            .bind(movie_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((ratings, total))
    }

    pub async fn my_rating(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RatingResponse>> {
        let rating = sqlx::query_as::<_, Rating>(
            r#"
            SELECT id, movie_id, user_id, score, comment, voter_country,
                   created_at, updated_at
            FROM ratings
            WHERE movie_id = $1 AND user_id = $2
            "#,
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rating.map(|r| RatingResponse {
            id: r.id,
            movie_id: r.movie_id,
            score: r.score,
            comment: r.comment,
            voter_country: r.voter_country,
            created_at: r.created_at,
            user: None,
        }))
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> Result<(Vec<UserRatingItem>, i64)> {
        let rows = sqlx::query(
            r#"
            SELECT r.id AS rating_id, r.score, r.comment, r.voter_country,
                   r.created_at AS rated_at,
                   m.id, m.title, m.original_title, m.year, m.summary,
                   m.average_rating, m.metascore, m.trailer_url, m.image_url,
                   m.runtime_min, m.release_date, m.language
            FROM ratings r
            JOIN movies m ON m.id = r.movie_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
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
            items.push(UserRatingItem {
                id: row.try_get("rating_id")?,
                score: row.try_get("score")?,
                comment: row.try_get("comment")?,
                voter_country: row.try_get("voter_country")?,
                created_at: row.try_get("rated_at")?,
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

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }
}

/// Mean of all scores rounded to 1 decimal, 0.0 with no ratings.
fn cached_average(scores: &[i16]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: i64 = scores.iter().map(|s| i64::from(*s)).sum();
    let mean = sum as f64 / scores.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Per-country vote count and average score, most votes first.
pub(crate) async fn country_distribution(
    pool: &PgPool,
    movie_id: Uuid,
) -> Result<Vec<CountryBreakdown>> {
    let breakdown = sqlx::query_as::<_, CountryBreakdown>(
        r#"
        SELECT voter_country AS country,
               COUNT(*) AS votes,
               ROUND(AVG(score)::numeric, 2)::double precision AS avg_score
        FROM ratings
        WHERE movie_id = $1
        GROUP BY voter_country
        ORDER BY votes DESC, country ASC
        "#,
    )
    .bind(movie_id)
    .fetch_all(pool)
    .await?;

    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_mixed_scores() {
        assert_eq!(cached_average(&[9, 9, 9, 1]), 7.0);
    }

    #[test]
    fn test_average_with_no_ratings_is_zero() {
        assert_eq!(cached_average(&[]), 0.0);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        assert_eq!(cached_average(&[8, 7]), 7.5);
        assert_eq!(cached_average(&[7, 7, 8]), 7.3);
        assert_eq!(cached_average(&[10]), 10.0);
    }
}
