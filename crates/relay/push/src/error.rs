use relay_auth::AuthError;
use serde_json::Value;
use thiserror::Error;

/// FCM send failures.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("FCM API error: {status}")]
    Rejected { status: u16, body: Value },

    #[error("FCM send request failed: {0}")]
    Transport(String),
}

impl UpstreamError {
    /// Upstream error payload if FCM answered, otherwise the message text.
    pub fn details(&self) -> Value {
        match self {
            Self::Rejected { body, .. } => body.clone(),
            Self::Transport(message) => Value::String(message.clone()),
        }
    }
}

/// Single-send failure.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    pub fn details(&self) -> Value {
        match self {
            Self::Auth(e) => Value::String(e.to_string()),
            Self::Upstream(e) => e.details(),
        }
    }
}
