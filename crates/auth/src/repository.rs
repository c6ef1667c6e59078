use crate::error::{AuthError, Result};
use async_trait::async_trait;
use cinelog_core::models::{User, PROVIDER_LOCAL};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, full_name, country, city, photo_url, \
                            auth_provider, created_at, updated_at";

/// Fields a user may change on their own profile. Absent fields are
/// left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserStatistics {
    pub ratings_count: i64,
    pub watchlist_count: i64,
    pub average_rating_given: f64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_local_user(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        country: Option<&str>,
        city: Option<&str>,
    ) -> Result<User>;
    #[allow(clippy::too_many_arguments)]
    async fn create_social_user(
        &self,
        email: &str,
        full_name: &str,
        photo_url: Option<&str>,
        country: &str,
        city: &str,
        provider: &str,
    ) -> Result<User>;
    /// Refresh name and photo from the identity provider and record
    /// the account as belonging to that provider.
    async fn refresh_social_profile(
        &self,
        id: Uuid,
        full_name: &str,
        photo_url: Option<&str>,
        provider: &str,
    ) -> Result<User>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User>;
    async fn user_statistics(&self, id: Uuid) -> Result<UserStatistics>;
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_create_error(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AuthError::EmailTaken;
        }
    }
    AuthError::Database(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_local_user(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        country: Option<&str>,
        city: Option<&str>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, full_name, country, city, auth_provider)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(country)
        .bind(city)
        .bind(PROVIDER_LOCAL)
        .fetch_one(&self.pool)
        .await
        .map_err(map_create_error)?;

        Ok(user)
    }

    async fn create_social_user(
        &self,
        email: &str,
        full_name: &str,
        photo_url: Option<&str>,
        country: &str,
        city: &str,
        provider: &str,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, full_name, photo_url, country, city, auth_provider)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(full_name)
        .bind(photo_url)
        .bind(country)
        .bind(city)
        .bind(provider)
        .fetch_one(&self.pool)
        .await
        .map_err(map_create_error)?;

        Ok(user)
    }

    async fn refresh_social_profile(
        &self,
        id: Uuid,
        full_name: &str,
        photo_url: Option<&str>,
        provider: &str,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET full_name = $1,
                photo_url = COALESCE($2, photo_url),
                auth_provider = $3,
                updated_at = NOW()
            WHERE id = $4
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(full_name)
        .bind(photo_url)
        .bind(provider)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::UserNotFound)?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($1, full_name),
                country = COALESCE($2, country),
                city = COALESCE($3, city),
                photo_url = COALESCE($4, photo_url),
                updated_at = NOW()
            WHERE id = $5
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(update.full_name.as_deref())
        .bind(update.country.as_deref())
        .bind(update.city.as_deref())
        .bind(update.photo_url.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::UserNotFound)?;

        Ok(user)
    }

    async fn user_statistics(&self, id: Uuid) -> Result<UserStatistics> {
        let stats = sqlx::query_as::<_, UserStatistics>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM ratings WHERE user_id = $1) AS ratings_count,
                (SELECT COUNT(*) FROM watchlist WHERE user_id = $1) AS watchlist_count,
                (SELECT COALESCE(AVG(score)::double precision, 0)
                   FROM ratings WHERE user_id = $1) AS average_rating_given
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserStatistics {
            average_rating_given: (stats.average_rating_given * 100.0).round() / 100.0,
            ..stats
        })
    }
}
