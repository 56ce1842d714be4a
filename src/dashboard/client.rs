use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    api::{
        AcceptMessagesData, AcceptMessagesRequest, DeleteMessageRequest, MessagesData,
        SendMessageRequest,
    },
    auth::SignInRequest,
    db::Message,
    session::SessionUser,
    ApiResponse,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error status.
    #[error("{status}: {}", message.as_deref().unwrap_or("no message"))]
    Api { status: StatusCode, message: Option<String> },

    #[error("unexpected response: {0}")]
    Unexpected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// The message the server supplied, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            ClientError::Unexpected(_) => None,
        }
    }
}

/// Talks to the JSON API, keeping the session cookie between calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    origin: Url,
}

impl ApiClient {
    pub fn new(origin: &str) -> Result<Self, ClientError> {
        let origin = Url::parse(origin).map_err(|e| ClientError::Unexpected(e.to_string()))?;
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { http, origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn profile_url(&self, username: &str) -> Result<Url, ClientError> {
        self.url(&format!("/u/{username}"))
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.origin.join(path).map_err(|e| ClientError::Unexpected(e.to_string()))
    }

    /// `Ok(None)` means 204 No Content.
    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<ApiResponse<T>>, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response
                .json::<ApiResponse<serde_json::Value>>()
                .await
                .ok()
                .map(|body| body.message);
            return Err(ClientError::Api { status, message });
        }

        Ok(Some(response.json().await?))
    }

    async fn call_with_body<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ClientError> {
        self.call(request)
            .await?
            .ok_or_else(|| ClientError::Unexpected("empty response".to_owned()))
    }

    pub async fn sign_in(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError> {
        let request = self.http.post(self.url("/api/sign-in")?).json(&SignInRequest {
            identifier: identifier.to_owned(),
            password: password.to_owned(),
        });
        self.call_with_body::<SessionUser>(request)
            .await?
            .data
            .ok_or_else(|| ClientError::Unexpected("sign-in returned no user".to_owned()))
    }

    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.call_with_body::<()>(self.http.post(self.url("/api/sign-out")?)).await?;
        Ok(())
    }

    /// `Ok(None)` when nobody is signed in.
    pub async fn session(&self) -> Result<Option<SessionUser>, ClientError> {
        match self.call_with_body::<SessionUser>(self.http.get(self.url("/api/session")?)).await {
            Ok(body) => Ok(body.data),
            Err(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn accept_messages(&self) -> Result<bool, ClientError> {
        let body = self
            .call_with_body::<AcceptMessagesData>(self.http.get(self.url("/api/accept-message")?))
            .await?;
        body.data
            .map(|data| data.user_accepting_message)
            .ok_or_else(|| ClientError::Unexpected("missing acceptance status".to_owned()))
    }

    pub async fn set_accept_messages(
        &self,
        accept_messages: bool,
    ) -> Result<ApiResponse<AcceptMessagesData>, ClientError> {
        let request = self
            .http
            .post(self.url("/api/accept-message")?)
            .json(&AcceptMessagesRequest { accept_messages });
        self.call_with_body(request).await
    }

    /// `Ok(None)` when the server reports no content.
    pub async fn messages(&self) -> Result<Option<Vec<Message>>, ClientError> {
        let body = self.call::<MessagesData>(self.http.get(self.url("/api/get-message")?)).await?;
        Ok(body.map(|body| body.data.map(|data| data.messages).unwrap_or_default()))
    }

    pub async fn delete_message(&self, message_id: &str) -> Result<ApiResponse, ClientError> {
        let message_id =
            Uuid::parse_str(message_id).map_err(|e| ClientError::Unexpected(e.to_string()))?;
        let request = self
            .http
            .post(self.url("/api/delete-message")?)
            .json(&DeleteMessageRequest { message_id });
        self.call_with_body(request).await
    }

    pub async fn send_message(
        &self,
        username: &str,
        content: &str,
    ) -> Result<ApiResponse, ClientError> {
        let request = self.http.post(self.url("/api/send-message")?).json(&SendMessageRequest {
            username: username.to_owned(),
            content: content.to_owned(),
        });
        self.call_with_body(request).await
    }
}
