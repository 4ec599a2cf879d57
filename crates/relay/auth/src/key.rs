//! Service account credentials.

use std::path::Path;

use serde::Deserialize;

use crate::AuthError;

/// Google OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Fields of a Google service account JSON key that the relay uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Read a JSON key file as downloaded from the Firebase console.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AuthError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let key = serde_json::from_str(&content)?;
        Ok(key)
    }

    /// Build a key from inline fields.
    ///
    /// Escaped `\n` sequences in the private key are unescaped so keys pasted
    /// into a single config line still parse.
    pub fn inline(client_email: impl Into<String>, private_key: &str) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.replace("\\n", "\n"),
            project_id: None,
            token_uri: default_token_uri(),
        }
    }
}

/// Check that `private_key` is a PEM encoded private key block.
pub(crate) fn check_private_key(private_key: &str) -> Result<(), AuthError> {
    let block = pem::parse(private_key).map_err(|e| AuthError::MalformedKey(e.to_string()))?;

    match block.tag() {
        "PRIVATE KEY" | "RSA PRIVATE KEY" => Ok(()),
        other => Err(AuthError::MalformedKey(format!(
            "expected a private key PEM block, found {other}"
        ))),
    }
}
