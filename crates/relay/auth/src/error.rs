use std::path::PathBuf;

use thiserror::Error;

/// Credential loading and token exchange errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("failed to read service account file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse service account file: {0}")]
    KeyFile(#[from] serde_json::Error),

    #[error("malformed private key: {0}")]
    MalformedKey(String),

    #[error("failed to sign token assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to parse token response: {0}")]
    Response(String),
}
