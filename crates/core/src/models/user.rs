use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const PROVIDER_LOCAL: &str = "local";
pub const PROVIDER_GOOGLE: &str = "google";

/// A user account. `password_hash` is NULL for accounts created via a
/// social provider, which therefore cannot use password login.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub full_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub photo_url: Option<String>,
    pub auth_provider: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub photo_url: Option<String>,
    pub auth_provider: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            country: user.country,
            city: user.city,
            photo_url: user.photo_url,
            auth_provider: user.auth_provider,
            created_at: user.created_at,
        }
    }
}
