use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::auth::AuthConfig;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("identity service is not configured")]
    NotConfigured,
    #[error("identity service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity service returned {0}")]
    Status(StatusCode),
    #[error("identity service rejected the session")]
    Rejected,
    #[error("invalid identity service url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Deserialize)]
struct RedirectUrlResponse {
    #[serde(alias = "redirectUrl")]
    redirect_url: String,
}

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    #[serde(alias = "sessionToken")]
    session_token: String,
}

/// Client for the upstream identity service. Every call carries the service API key as a
/// bearer token; the session token it hands back is opaque to us.
#[derive(Clone)]
pub struct SessionClient {
    http_client: reqwest::Client,
    base_url: Option<Url>,
    api_key: Option<String>,
}

impl SessionClient {
    pub fn new(config: &AuthConfig) -> Self {
        let base_url = config.service_base_url.clone().map(|mut url| {
            // `Url::join` replaces the last segment unless the path ends in '/'.
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            url
        });

        Self {
            http_client: reqwest::Client::new(),
            base_url,
            api_key: config.service_api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<(Url, &str), SessionError> {
        match (&self.base_url, &self.api_key) {
            (Some(base), Some(key)) => Ok((base.join(path)?, key.as_str())),
            _ => Err(SessionError::NotConfigured),
        }
    }

    pub async fn google_redirect_url(&self) -> Result<String, SessionError> {
        let (url, api_key) = self.endpoint("oauth/google/redirect_url")?;
        let response = self.http_client.get(url).bearer_auth(api_key).send().await?;

        if !response.status().is_success() {
            return Err(SessionError::Status(response.status()));
        }

        let body: RedirectUrlResponse = response.json().await?;
        Ok(body.redirect_url)
    }

    /// Exchange an OAuth authorization code for an upstream session token.
    pub async fn create_session(&self, code: &str) -> Result<String, SessionError> {
        let (url, api_key) = self.endpoint("sessions")?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(api_key)
            .json(&CreateSessionRequest { code })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SessionError::Status(response.status()));
        }

        let body: CreateSessionResponse = response.json().await?;
        if body.session_token.is_empty() {
            return Err(SessionError::Rejected);
        }
        Ok(body.session_token)
    }

    /// Profile of the user owning `session_token`, passed through untouched.
    pub async fn current_user(&self, session_token: &str) -> Result<serde_json::Value, SessionError> {
        let (url, _) = self.endpoint("users/me")?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(session_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SessionError::Rejected),
            status if !status.is_success() => Err(SessionError::Status(status)),
            _ => Ok(response.json().await?),
        }
    }
}
