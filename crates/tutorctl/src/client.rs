//! HTTP client for communicating with tutord.

use anyhow::{anyhow, Result};
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tutor_shared::rpc::{ErrorResponse, FullOrchestratorResponse, HealthResponse, OrchestrateRequest};
use tutor_shared::{Session, TutorError};

/// Default daemon address
pub const DEFAULT_URL: &str = "http://127.0.0.1:7870";

/// Client for communicating with tutord
pub struct TutordClient {
    http: reqwest::Client,
    base_url: String,
}

impl TutordClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn unreachable(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow!(TutorError::DaemonUnreachable(format!(
            "{} ({})\n\nStart the daemon with: tutord",
            self.base_url, e
        )))
    }

    /// Turn a non-success response into an error carrying the daemon's message
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match response.json::<ErrorResponse>().await {
            Ok(err) => Err(anyhow!("{} (code {})", err.error, err.code)),
            Err(_) => Err(anyhow!("tutord returned HTTP {}", status)),
        }
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn orchestrate(&self, req: &OrchestrateRequest) -> Result<FullOrchestratorResponse> {
        let response = self
            .http
            .post(self.url("/api/orchestrate_full"))
            .json(req)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Fetch a session; None if the daemon does not know it
    pub async fn session(&self, session_id: &str) -> Result<Option<Session>> {
        let response = self
            .http
            .get(self.url(&format!("/api/sessions/{}", session_id)))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::check(response).await?.json().await?))
    }

    /// Returns true if the session existed
    pub async fn clear_session(&self, session_id: &str) -> Result<bool> {
        let response = self
            .http
            .delete(self.url(&format!("/api/sessions/{}", session_id)))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        let body: serde_json::Value = Self::check(response).await?.json().await?;
        Ok(body["cleared"].as_bool().unwrap_or(false))
    }
}
