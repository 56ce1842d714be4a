use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{db::User, AppError};

pub const SESSION_USER: &str = "session_user";

/// What the session knows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            is_verified: user.is_verified,
            is_accepting_messages: user.is_accepting_messages,
        }
    }
}

impl SessionUser {
    pub async fn load(session: &Session) -> Result<Option<Self>, AppError> {
        Ok(session.get::<SessionUser>(SESSION_USER).await?)
    }

    pub async fn store(&self, session: &Session) -> Result<(), AppError> {
        session.insert(SESSION_USER, self).await?;
        Ok(())
    }
}

/// Rejects with 401 when nobody is signed in.
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, reason)| AppError::Internal(anyhow::anyhow!(reason)))?;

        SessionUser::load(&session).await?.ok_or(AppError::Unauthorized)
    }
}
