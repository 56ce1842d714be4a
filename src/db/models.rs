use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verify_code: String,
    pub verify_code_expiry: OffsetDateTime,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub created_at: OffsetDateTime,
}

/// Fields of a registration that has not been verified yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verify_code: String,
    pub verify_code_expiry: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip)]
    pub user_id: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
