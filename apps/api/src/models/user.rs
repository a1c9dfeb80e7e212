use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// Full `users` row, credentials included. Never serialized to clients.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: NaiveDateTime,
}

/// The account as shown to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        }
    }
}
