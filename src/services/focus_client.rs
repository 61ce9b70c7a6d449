//! Focus-mode backend client.
//!
//! Talks to the `/api/focus/*` routes of the AI backend: URL relevance
//! checks plus the focus session lifecycle.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use url::Url;

use crate::types::errors::{ClientError, PolicyCheckError};
use crate::types::focus::{FocusSessionRequest, UrlCheckRequest, UrlCheckResponse};
use crate::types::settings::BackendSettings;

/// Trait defining the external focus-mode policy.
#[async_trait(?Send)]
pub trait FocusPolicy {
    async fn check_url(&self, request: &UrlCheckRequest) -> Result<UrlCheckResponse, PolicyCheckError>;
    /// Starts a session server-side and returns its id.
    async fn start_session(&self, request: &FocusSessionRequest) -> Result<String, PolicyCheckError>;
    /// Whether the backend currently has an active session.
    async fn active_session(&self) -> Result<bool, PolicyCheckError>;
    async fn end_session(&self) -> Result<(), PolicyCheckError>;
}

#[derive(Debug, Deserialize)]
struct StartSessionResponse {
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ActiveSessionResponse {
    #[serde(default)]
    active: bool,
}

#[derive(Debug, Deserialize)]
struct EndSessionResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP implementation of [`FocusPolicy`] backed by `reqwest`.
pub struct FocusClient {
    http: reqwest::Client,
    base: Url,
    request_timeout: Duration,
}

impl FocusClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, ClientError> {
        let mut raw = settings.api_base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|source| ClientError::InvalidBaseUrl {
            url: settings.api_base_url.clone(),
            source,
        })?;
        let request_timeout = Duration::from_millis(settings.request_timeout_ms);
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            base,
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, PolicyCheckError> {
        self.base
            .join(path)
            .map_err(|e| PolicyCheckError::Network(format!("bad endpoint {}: {}", path, e)))
    }

    fn failure(&self, err: reqwest::Error) -> PolicyCheckError {
        PolicyCheckError::from_reqwest(err, self.request_timeout)
    }
}

#[async_trait(?Send)]
impl FocusPolicy for FocusClient {
    async fn check_url(&self, request: &UrlCheckRequest) -> Result<UrlCheckResponse, PolicyCheckError> {
        let response = self
            .http
            .post(self.endpoint("api/focus/check-url")?)
            .json(request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.failure(e))?;
        response
            .json::<UrlCheckResponse>()
            .await
            .map_err(|e| self.failure(e))
    }

    async fn start_session(&self, request: &FocusSessionRequest) -> Result<String, PolicyCheckError> {
        let response = self
            .http
            .post(self.endpoint("api/focus/start")?)
            .json(request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.failure(e))?;
        let body: StartSessionResponse = response
            .json()
            .await
            .map_err(|e| self.failure(e))?;
        body.session_id
            .ok_or_else(|| PolicyCheckError::Decode("missing session_id".to_string()))
    }

    async fn active_session(&self) -> Result<bool, PolicyCheckError> {
        let response = self
            .http
            .get(self.endpoint("api/focus/active")?)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.failure(e))?;
        let body: ActiveSessionResponse = response
            .json()
            .await
            .map_err(|e| self.failure(e))?;
        Ok(body.active)
    }

    async fn end_session(&self) -> Result<(), PolicyCheckError> {
        let response = self
            .http
            .post(self.endpoint("api/focus/end")?)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.failure(e))?;
        let body: EndSessionResponse = response
            .json()
            .await
            .map_err(|e| self.failure(e))?;
        if !body.success {
            // The backend reports "no active session"; locally that is the goal state.
            debug!("end focus session: {}", body.message.unwrap_or_default());
        }
        Ok(())
    }
}
