use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row in the `users` table. Carries the password hash and session token,
/// so it is never serialized directly; see `api::format` for the projection.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub password: String,
    pub token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values required to insert a user. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password: String,
}
