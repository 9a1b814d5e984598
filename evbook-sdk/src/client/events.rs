//! Typed client for login and the event endpoints.

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::{
    ApproveEventRequest, EventView, LoginRequest, LoginResponse, MessageResponse,
    ProposeEventRequest, RejectEventRequest,
};
use crate::token::BEARER_PREFIX;

/// Typed HTTP client for the event-booking API.
///
/// Call [`login`](Self::login) first; the returned token is kept and sent on
/// every subsequent request.
#[derive(Debug, Clone)]
pub struct EventBookingClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl EventBookingClient {
    /// Create a new client for the server at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
            token: None,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Reuse a token obtained elsewhere.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// `POST /login` – exchange credentials for a bearer token.
    pub async fn login(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<LoginResponse, ClientError> {
        let url = self.base_url.join("/login")?;
        let body = LoginRequest {
            username: username.into(),
            password: password.into(),
        };

        let resp = self.http.post(url).json(&body).send().await?;
        let login: LoginResponse = parse_response(resp).await?;
        self.token = Some(login.token.clone());
        Ok(login)
    }

    /// `GET /api/events` – events visible to the logged-in user.
    pub async fn list_events(&self) -> Result<Vec<EventView>, ClientError> {
        let url = self.base_url.join("/api/events")?;
        let resp = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /api/events` – propose a new event (HR only).
    pub async fn propose_event(
        &self,
        payload: &ProposeEventRequest,
    ) -> Result<EventView, ClientError> {
        let url = self.base_url.join("/api/events")?;
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .json(payload)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /api/events/{id}/approve` – approve with a confirmed date.
    pub async fn approve_event(
        &self,
        event_id: i64,
        payload: &ApproveEventRequest,
    ) -> Result<MessageResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/events/{event_id}/approve"))?;
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .json(payload)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /api/events/{id}/reject` – reject with remarks.
    pub async fn reject_event(
        &self,
        event_id: i64,
        payload: &RejectEventRequest,
    ) -> Result<MessageResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/events/{event_id}/reject"))?;
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .json(payload)
            .send()
            .await?;

        parse_response(resp).await
    }

    fn bearer(&self) -> Result<String, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotLoggedIn)?;
        Ok(format!("{BEARER_PREFIX}{token}"))
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
