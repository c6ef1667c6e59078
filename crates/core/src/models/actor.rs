use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Actor {
    pub id: Uuid,
    pub full_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorResponse {
    pub id: Uuid,
    pub full_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
}

impl From<Actor> for ActorResponse {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            full_name: actor.full_name,
            bio: actor.bio,
            birth_date: actor.birth_date,
            photo_url: actor.photo_url,
        }
    }
}

/// An actor as they appear in a movie's cast list, ordered by billing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActorCredit {
    pub id: Uuid,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub billing_order: i16,
}
