use cinelog_core::models::{Actor, ActorResponse};
use cinelog_core::{CinelogError, Page, Result};
use serde::Serialize;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

const ACTOR_COLUMNS: &str = "id, full_name, bio, birth_date, photo_url, created_at, updated_at";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FilmographyEntry {
    pub id: Uuid,
    pub title: String,
    pub year: i16,
    pub image_url: Option<String>,
    pub average_rating: f64,
    pub billing_order: i16,
}

#[derive(Debug, Serialize)]
pub struct ActorDetail {
    #[serde(flatten)]
    pub actor: ActorResponse,
    pub filmography: Vec<FilmographyEntry>,
}

#[derive(Clone)]
pub struct ActorService {
    pool: PgPool,
}

impl ActorService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        page: Page,
    ) -> Result<(Vec<ActorResponse>, i64)> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {ACTOR_COLUMNS} FROM actors WHERE 1=1"
        ));
        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (full_name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR bio ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        qb.push(" ORDER BY full_name ASC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let actors = qb.build_query_as::<Actor>().fetch_all(&self.pool).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM actors WHERE 1=1");
        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            count_qb.push(" AND (full_name ILIKE ");
            count_qb.push_bind(pattern.clone());
            count_qb.push(" OR bio ILIKE ");
            count_qb.push_bind(pattern);
            count_qb.push(")");
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((actors.into_iter().map(ActorResponse::from).collect(), total))
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<ActorDetail> {
        let actor = sqlx::query_as::<_, Actor>(&format!(
            "SELECT {ACTOR_COLUMNS} FROM actors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CinelogError::NotFound("actor"))?;

        let filmography = sqlx::query_as::<_, FilmographyEntry>(
            r#"
            SELECT m.id, m.title, m.year, m.image_url, m.average_rating, ma.billing_order
            FROM movie_actors ma
            JOIN movies m ON m.id = ma.movie_id
            WHERE ma.actor_id = $1
            ORDER BY m.year DESC, m.title ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ActorDetail {
            actor: actor.into(),
            filmography,
        })
    }
}
