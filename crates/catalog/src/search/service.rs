use cinelog_core::{CinelogError, Result};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

const BUCKET_LIMIT: i64 = 10;
const TYPEAHEAD_BUDGET: usize = 3;
const TYPEAHEAD_PREFIX_CAP: usize = 2;
const TYPEAHEAD_MIN_CHARS: usize = 3;

/// What to match against. Unknown values fall back to `All` at the
/// HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    All,
    Title,
    Summary,
    People,
}

impl SearchMode {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("title") => SearchMode::Title,
            Some("summary") => SearchMode::Summary,
            Some("people") => SearchMode::People,
            _ => SearchMode::All,
        }
    }

    fn includes_titles(self) -> bool {
        matches!(self, SearchMode::All | SearchMode::Title)
    }

    fn includes_summaries(self) -> bool {
        matches!(self, SearchMode::All | SearchMode::Summary)
    }

    fn includes_people(self) -> bool {
        matches!(self, SearchMode::All | SearchMode::People)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MovieHit {
    pub id: Uuid,
    pub title: String,
    pub year: i16,
    pub image_url: Option<String>,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActorHit {
    pub id: Uuid,
    pub full_name: String,
    pub photo_url: Option<String>,
}

/// Both buckets are always present; a mode that does not request a
/// bucket leaves it empty.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub titles: Vec<MovieHit>,
    pub people: Vec<ActorHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Suggestion {
    Movie {
        id: Uuid,
        title: String,
        year: i16,
        image_url: Option<String>,
        score: f64,
    },
    Actor {
        id: Uuid,
        name: String,
        photo_url: Option<String>,
    },
}

impl Suggestion {
    fn movie_id(&self) -> Option<Uuid> {
        match self {
            Suggestion::Movie { id, .. } => Some(*id),
            Suggestion::Actor { .. } => None,
        }
    }
}

/// Assemble typeahead output from the three candidate tiers: title
/// prefix matches (at most two), then substring matches, then actors,
/// never exceeding the budget and never repeating a movie.
pub fn fill_suggestions(
    prefix_hits: Vec<Suggestion>,
    substring_hits: Vec<Suggestion>,
    actor_hits: Vec<Suggestion>,
    budget: usize,
) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::with_capacity(budget);

    for hit in prefix_hits.into_iter().take(TYPEAHEAD_PREFIX_CAP) {
        if out.len() >= budget {
            return out;
        }
        out.push(hit);
    }

    for hit in substring_hits.into_iter().chain(actor_hits) {
        if out.len() >= budget {
            break;
        }
        let duplicate = hit
            .movie_id()
            .is_some_and(|id| out.iter().any(|s| s.movie_id() == Some(id)));
        if !duplicate {
            out.push(hit);
        }
    }

    out
}

#[derive(Clone)]
pub struct SearchService {
    pool: PgPool,
}

impl SearchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn search(&self, query: &str, mode: SearchMode) -> Result<SearchResults> {
        let term = query.trim();
        if term.is_empty() {
            return Err(CinelogError::Validation("q is required".into()));
        }
        let pattern = format!("%{}%", term);

        let mut titles: Vec<MovieHit> = Vec::new();

        if mode.includes_titles() {
            let hits = sqlx::query_as::<_, MovieHit>(
                r#"
                SELECT id, title, year, image_url, average_rating
                FROM movies
                WHERE title ILIKE $1 OR original_title ILIKE $1
                ORDER BY average_rating DESC, title ASC
                LIMIT $2
                "#,
            )
            .bind(&pattern)
            .bind(BUCKET_LIMIT)
            .fetch_all(&self.pool)
            .await?;
            titles.extend(hits);
        }

        if mode.includes_summaries() {
            let hits = sqlx::query_as::<_, MovieHit>(
                r#"
                SELECT id, title, year, image_url, average_rating
                FROM movies
                WHERE summary ILIKE $1
                ORDER BY average_rating DESC, title ASC
                LIMIT $2
                "#,
            )
            .bind(&pattern)
            .bind(BUCKET_LIMIT)
            .fetch_all(&self.pool)
            .await?;
            titles.extend(hits);
        }

        // In all-mode an actor name also surfaces that actor's movies.
        if mode == SearchMode::All {
            let hits = sqlx::query_as::<_, MovieHit>(
                r#"
                SELECT DISTINCT m.id, m.title, m.year, m.image_url, m.average_rating
                FROM movies m
                JOIN movie_actors ma ON ma.movie_id = m.id
                JOIN actors a ON a.id = ma.actor_id
                WHERE a.full_name ILIKE $1
                ORDER BY m.average_rating DESC, m.title ASC
                LIMIT $2
                "#,
            )
            .bind(&pattern)
            .bind(BUCKET_LIMIT)
            .fetch_all(&self.pool)
            .await?;
            titles.extend(hits);
        }

        let titles = dedup_movies(titles, BUCKET_LIMIT as usize);

        let people = if mode.includes_people() {
            sqlx::query_as::<_, ActorHit>(
                r#"
                SELECT id, full_name, photo_url
                FROM actors
                WHERE full_name ILIKE $1
                ORDER BY full_name ASC
                LIMIT $2
                "#,
            )
            .bind(&pattern)
            .bind(BUCKET_LIMIT)
            .fetch_all(&self.pool)
            .await?
        } else {
            Vec::new()
        };

        Ok(SearchResults { titles, people })
    }

    /// Up to three suggestions for an as-you-type query.
    pub async fn typeahead(&self, query: &str) -> Result<Vec<Suggestion>> {
        let term = query.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        if term.chars().count() < TYPEAHEAD_MIN_CHARS {
            return Err(CinelogError::Validation(
                "q must be at least 3 characters".into(),
            ));
        }

        let prefix_pattern = format!("{}%", term);
        let substring_pattern = format!("%{}%", term);

        let prefix_hits = sqlx::query_as::<_, MovieHit>(
            r#"
            SELECT id, title, year, image_url, average_rating
            FROM movies
            WHERE title ILIKE $1
            ORDER BY average_rating DESC, title ASC
            LIMIT $2
            "#,
        )
        .bind(&prefix_pattern)
        .bind(TYPEAHEAD_PREFIX_CAP as i64)
        .fetch_all(&self.pool)
        .await?;

        let substring_hits = sqlx::query_as::<_, MovieHit>(
            r#"
            SELECT id, title, year, image_url, average_rating
            FROM movies
            WHERE title ILIKE $1 AND title NOT ILIKE $2
            ORDER BY average_rating DESC, title ASC
            LIMIT $3
            "#,
        )
        .bind(&substring_pattern)
        .bind(&prefix_pattern)
        .bind(TYPEAHEAD_BUDGET as i64)
        .fetch_all(&self.pool)
        .await?;

        let actor_hits = sqlx::query_as::<_, ActorHit>(
            r#"
            SELECT id, full_name, photo_url
            FROM actors
            WHERE full_name ILIKE $1
            ORDER BY full_name ASC
            LIMIT $2
            "#,
        )
        .bind(&substring_pattern)
        .bind(TYPEAHEAD_BUDGET as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(fill_suggestions(
            prefix_hits.into_iter().map(movie_suggestion).collect(),
            substring_hits.into_iter().map(movie_suggestion).collect(),
            actor_hits.into_iter().map(actor_suggestion).collect(),
            TYPEAHEAD_BUDGET,
        ))
    }
}

fn movie_suggestion(hit: MovieHit) -> Suggestion {
    Suggestion::Movie {
        id: hit.id,
        title: hit.title,
        year: hit.year,
        image_url: hit.image_url,
        score: hit.average_rating,
    }
}

fn actor_suggestion(hit: ActorHit) -> Suggestion {
    Suggestion::Actor {
        id: hit.id,
        name: hit.full_name,
        photo_url: hit.photo_url,
    }
}

/// Drop repeated movie ids keeping first-seen order, then truncate.
fn dedup_movies(hits: Vec<MovieHit>, limit: usize) -> Vec<MovieHit> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(limit);
    for hit in hits {
        if seen.insert(hit.id) {
            out.push(hit);
            if out.len() >= limit {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u128, score: f64) -> Suggestion {
        Suggestion::Movie {
            id: Uuid::from_u128(id),
            title: format!("Movie {}", id),
            year: 2000,
            image_url: None,
            score,
        }
    }

    fn actor(id: u128) -> Suggestion {
        Suggestion::Actor {
            id: Uuid::from_u128(id),
            name: format!("Actor {}", id),
            photo_url: None,
        }
    }

    #[test]
    fn test_mode_parse_fallback() {
        assert_eq!(SearchMode::parse(Some("title")), SearchMode::Title);
        assert_eq!(SearchMode::parse(Some("summary")), SearchMode::Summary);
        assert_eq!(SearchMode::parse(Some("people")), SearchMode::People);
        assert_eq!(SearchMode::parse(Some("whatever")), SearchMode::All);
        assert_eq!(SearchMode::parse(None), SearchMode::All);
    }

    #[test]
    fn test_fill_prefix_capped_at_two() {
        let out = fill_suggestions(
            vec![movie(1, 9.0), movie(2, 8.0), movie(3, 7.0)],
            vec![movie(4, 6.0)],
            vec![],
            3,
        );
        assert_eq!(out.len(), 3);
        // Third prefix hit is dropped in favor of the substring tier.
        assert_eq!(out[2], movie(4, 6.0));
    }

    #[test]
    fn test_fill_never_exceeds_budget() {
        let out = fill_suggestions(
            vec![movie(1, 9.0), movie(2, 8.0)],
            vec![movie(3, 7.0), movie(4, 6.0)],
            vec![actor(5), actor(6)],
            3,
        );
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_fill_skips_duplicate_movies() {
        let out = fill_suggestions(
            vec![movie(1, 9.0)],
            vec![movie(1, 9.0), movie(2, 8.0)],
            vec![actor(3)],
            3,
        );
        assert_eq!(out, vec![movie(1, 9.0), movie(2, 8.0), actor(3)]);
    }

    #[test]
    fn test_fill_actors_pad_the_tail() {
        let out = fill_suggestions(vec![], vec![], vec![actor(1), actor(2), actor(3), actor(4)], 3);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_fill_empty_tiers() {
        assert!(fill_suggestions(vec![], vec![], vec![], 3).is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let a = MovieHit {
            id: Uuid::from_u128(1),
            title: "A".into(),
            year: 2000,
            image_url: None,
            average_rating: 9.0,
        };
        let b = MovieHit {
            id: Uuid::from_u128(2),
            title: "B".into(),
            year: 2001,
            image_url: None,
            average_rating: 8.0,
        };
        let hits = vec![a.clone(), b.clone(), a.clone()];
        let out = dedup_movies(hits, 10);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, a.id);
        assert_eq!(out[1].id, b.id);
    }
}
