//! OAuth2 access token exchange.

use std::fmt;
use std::path::Path;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::key::check_private_key;
use crate::{AuthError, ServiceAccountKey};

/// OAuth2 scope for sending through FCM.
pub const FIREBASE_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Short-lived bearer credential returned by the token endpoint.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    access_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in: 0,
            token_type: "Bearer".to_string(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.access_token
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Source of bearer tokens for outbound FCM calls.
#[trait_variant::make(Send)]
pub trait TokenProvider: Send + Sync {
    /// Fetch a fresh access token.
    async fn access_token(&self) -> Result<AccessToken, AuthError>;
}

/// JWT claims for the service account assertion.
#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    sub: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Service account credential provider.
///
/// Every call to [`TokenProvider::access_token`] signs a new assertion and
/// exchanges it at the token endpoint. Nothing is cached.
pub struct ServiceAccountAuth {
    client_email: String,
    project_id: Option<String>,
    token_uri: String,
    key: EncodingKey,
    http: reqwest::Client,
}

impl ServiceAccountAuth {
    /// Create a provider from loaded credentials.
    pub fn new(key: ServiceAccountKey) -> Result<Self, AuthError> {
        check_private_key(&key.private_key)?;
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;

        Ok(Self {
            client_email: key.client_email,
            project_id: key.project_id,
            token_uri: key.token_uri,
            key: encoding_key,
            http: reqwest::Client::new(),
        })
    }

    /// Create a provider from a service account JSON key file.
    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        Self::new(ServiceAccountKey::from_file(path)?)
    }

    /// Create a provider from inline client email and private key.
    pub fn from_inline(
        client_email: impl Into<String>,
        private_key: &str,
    ) -> Result<Self, AuthError> {
        Self::new(ServiceAccountKey::inline(client_email, private_key))
    }

    /// Override the token endpoint.
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Project ID from the key file, if it carried one.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn assertion(&self) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            iss: &self.client_email,
            sub: &self.client_email,
            scope: FIREBASE_MESSAGING_SCOPE,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)?;
        Ok(token)
    }
}

impl TokenProvider for ServiceAccountAuth {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        let assertion = self.assertion()?;

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "token endpoint rejected assertion");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let token: AccessToken =
            serde_json::from_str(&body).map_err(|e| AuthError::Response(e.to_string()))?;
        tracing::debug!(expires_in = token.expires_in, "obtained access token");

        Ok(token)
    }
}
