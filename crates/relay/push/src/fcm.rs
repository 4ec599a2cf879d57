//! FCM HTTP v1 sender using reqwest.

use relay_auth::AccessToken;
use relay_core::Envelope;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::{Pusher, UpstreamError};

/// Production FCM endpoint.
pub const DEFAULT_FCM_BASE_URL: &str = "https://fcm.googleapis.com";

/// Sends composed messages to `projects/{id}/messages:send`.
pub struct FcmPusher {
    http: reqwest::Client,
    send_url: String,
}

impl FcmPusher {
    /// Create a pusher for the given Firebase project.
    pub fn new(project_id: &str) -> Self {
        Self::with_base_url(DEFAULT_FCM_BASE_URL, project_id)
    }

    /// Create a pusher against a non-default FCM host (emulators, tests).
    pub fn with_base_url(base_url: &str, project_id: &str) -> Self {
        let send_url = format!(
            "{}/v1/projects/{}/messages:send",
            base_url.trim_end_matches('/'),
            project_id
        );

        Self {
            http: reqwest::Client::new(),
            send_url,
        }
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }
}

impl Pusher for FcmPusher {
    async fn push(
        &self,
        token: &AccessToken,
        envelope: &Envelope,
    ) -> Result<Value, UpstreamError> {
        let response = self
            .http
            .post(&self.send_url)
            .header(AUTHORIZATION, token.bearer())
            .json(envelope)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        // FCM answers JSON; keep the raw text if a proxy in between did not,
        // and fall back to the status line when there is no body at all.
        let body = if text.trim().is_empty() {
            Value::String(format!("Request failed with status code {}", status.as_u16()))
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(UpstreamError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
