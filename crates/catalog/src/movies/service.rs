use chrono::NaiveDate;
use cinelog_core::models::{ActorCredit, CountryBreakdown, Movie, MovieResponse, PopularitySnapshot};
use cinelog_core::validation;
use cinelog_core::{CinelogError, Page, Result};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

const MOVIE_COLUMNS: &str = "id, title, original_title, year, summary, average_rating, \
                             metascore, trailer_url, image_url, runtime_min, release_date, \
                             language, created_at, updated_at";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovieSort {
    #[default]
    Popularity,
    Rating,
    Year,
    Title,
}

impl MovieSort {
    /// Lenient parse; anything unrecognized falls back to popularity.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("rating") => MovieSort::Rating,
            Some("year") => MovieSort::Year,
            Some("title") => MovieSort::Title,
            _ => MovieSort::Popularity,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MovieFilters {
    pub search: Option<String>,
    pub year: Option<i16>,
    pub min_rating: Option<f64>,
    pub sort: MovieSort,
}

/// Movie list item: the movie plus its vote count and, when a
/// snapshot exists, its latest popularity score.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MovieListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub rating_count: i64,
    pub popularity_score: Option<f64>,
}

// Serializable projection of the movie columns used in list rows.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MovieSummary {
    pub id: Uuid,
    pub title: String,
    pub original_title: Option<String>,
    pub year: i16,
    pub summary: Option<String>,
    pub average_rating: f64,
    pub metascore: Option<i16>,
    pub image_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: MovieResponse,
    pub actors: Vec<ActorCredit>,
    pub categories: Vec<String>,
    pub popularity: Option<PopularitySnapshot>,
    pub rating_count: i64,
    pub rating_distribution: Vec<CountryBreakdown>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub year: i16,
    pub summary: String,
    pub original_title: Option<String>,
    pub metascore: Option<i16>,
    pub trailer_url: Option<String>,
    pub image_url: Option<String>,
    pub runtime_min: Option<i16>,
    pub release_date: Option<NaiveDate>,
    pub language: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Clone)]
pub struct MovieService {
    pool: PgPool,
}

impl MovieService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filters: &MovieFilters) {
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (m.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR m.original_title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR m.summary ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        if let Some(year) = filters.year {
            qb.push(" AND m.year = ");
            qb.push_bind(year);
        }
        if let Some(min_rating) = filters.min_rating {
            qb.push(" AND m.average_rating >= ");
            qb.push_bind(min_rating);
        }
    }

    pub async fn list(
        &self,
        filters: &MovieFilters,
        page: Page,
    ) -> Result<(Vec<MovieListItem>, i64)> {
        let mut qb = QueryBuilder::new(
            "SELECT m.id, m.title, m.original_title, m.year, m.summary, m.average_rating, \
             m.metascore, m.image_url, m.release_date, m.language, \
             (SELECT COUNT(*) FROM ratings r WHERE r.movie_id = m.id) AS rating_count, \
             ps.score AS popularity_score \
             FROM movies m \
             LEFT JOIN LATERAL ( \
                 SELECT score FROM popularity_snapshots s \
                 WHERE s.movie_id = m.id \
                 ORDER BY snapshot_date DESC LIMIT 1 \
             ) ps ON TRUE \
             WHERE 1=1",
        );
        Self::push_filters(&mut qb, filters);

        qb.push(match filters.sort {
            MovieSort::Popularity => {
                " ORDER BY ps.score DESC NULLS LAST, m.average_rating DESC, m.title ASC"
            }
            MovieSort::Rating => " ORDER BY m.average_rating DESC, m.title ASC",
            MovieSort::Year => " ORDER BY m.year DESC, m.title ASC",
            MovieSort::Title => " ORDER BY m.title ASC",
        });

        qb.push(" LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let items = qb
            .build_query_as::<MovieListItem>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM movies m WHERE 1=1");
        Self::push_filters(&mut count_qb, filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Movie> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CinelogError::NotFound("movie"))?;

        Ok(movie)
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<MovieDetail> {
        let movie = self.get(id).await?;

        let actors = sqlx::query_as::<_, ActorCredit>(
            r#"
            SELECT a.id, a.full_name, a.photo_url, ma.billing_order
            FROM movie_actors ma
            JOIN actors a ON a.id = ma.actor_id
            WHERE ma.movie_id = $1
            ORDER BY ma.billing_order ASC, a.full_name ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT c.name
            FROM movie_categories mc
            JOIN categories c ON c.id = mc.category_id
            WHERE mc.movie_id = $1
            ORDER BY c.name ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let popularity = sqlx::query_as::<_, PopularitySnapshot>(
            r#"
            SELECT movie_id, snapshot_date, score, rank
            FROM popularity_snapshots
            WHERE movie_id = $1
            ORDER BY snapshot_date DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let rating_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE movie_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        let rating_distribution =
            crate::ratings::service::country_distribution(&self.pool, id).await?;

        Ok(MovieDetail {
            movie: movie.into(),
            actors,
            categories,
            popularity,
            rating_count,
            rating_distribution,
        })
    }

    pub async fn create(&self, req: &CreateMovieRequest) -> Result<Movie> {
        if req.title.trim().is_empty() {
            return Err(CinelogError::Validation("title must not be empty".into()));
        }
        if req.summary.trim().is_empty() {
            return Err(CinelogError::Validation("summary must not be empty".into()));
        }
        validation::validate_year(req.year)?;
        if let Some(metascore) = req.metascore {
            if !(0..=100).contains(&metascore) {
                return Err(CinelogError::Validation(
                    "metascore must be between 0 and 100".into(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let movie = sqlx::query_as::<_, Movie>(&format!(
            r#"
            INSERT INTO movies (title, original_title, year, summary, metascore,
                                trailer_url, image_url, runtime_min, release_date, language)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(req.title.trim())
        .bind(req.original_title.as_deref())
        .bind(req.year)
        .bind(req.summary.trim())
        .bind(req.metascore)
        .bind(req.trailer_url.as_deref())
        .bind(req.image_url.as_deref())
        .bind(req.runtime_min)
        .bind(req.release_date)
        .bind(req.language.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        for name in &req.categories {
            let category_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO categories (name)
                VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO movie_categories (movie_id, category_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(movie.id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie created");

        Ok(movie)
    }

    /// Well-rated movies the user has neither rated nor watchlisted.
    pub async fn recommendations(&self, user_id: Uuid, limit: i64) -> Result<Vec<MovieResponse>> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            r#"
            SELECT {MOVIE_COLUMNS}
            FROM movies m
            WHERE m.average_rating >= 7.0
              AND NOT EXISTS (SELECT 1 FROM ratings r
                              WHERE r.movie_id = m.id AND r.user_id = $1)
              AND NOT EXISTS (SELECT 1 FROM watchlist w
                              WHERE w.movie_id = m.id AND w.user_id = $1)
            ORDER BY m.average_rating DESC, m.title ASC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies.into_iter().map(MovieResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_fallback() {
        assert_eq!(MovieSort::parse(Some("rating")), MovieSort::Rating);
        assert_eq!(MovieSort::parse(Some("year")), MovieSort::Year);
        assert_eq!(MovieSort::parse(Some("title")), MovieSort::Title);
        assert_eq!(MovieSort::parse(Some("popularity")), MovieSort::Popularity);
        assert_eq!(MovieSort::parse(Some("bogus")), MovieSort::Popularity);
        assert_eq!(MovieSort::parse(None), MovieSort::Popularity);
    }
}
