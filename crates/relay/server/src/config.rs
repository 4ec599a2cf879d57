use std::fmt;
use std::path::{Path, PathBuf};

use relay_auth::{AuthError, ServiceAccountAuth};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "FCM_RELAY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "relay.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
    #[error("No project_id configured and the service account key does not carry one")]
    MissingProjectId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_fanout_limit")]
    pub fanout_limit: usize,
    #[serde(default = "default_fcm_base_url")]
    pub fcm_base_url: String,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Where the service account secret comes from.
#[derive(Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CredentialsConfig {
    Inline {
        client_email: String,
        private_key: String,
        #[serde(default)]
        token_uri: Option<String>,
    },
    KeyFile {
        key_file: PathBuf,
    },
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self::KeyFile {
            key_file: PathBuf::from("./serviceAccountKey.json"),
        }
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline {
                client_email,
                token_uri,
                ..
            } => f
                .debug_struct("Inline")
                .field("client_email", client_email)
                .field("private_key", &"<redacted>")
                .field("token_uri", token_uri)
                .finish(),
            Self::KeyFile { key_file } => {
                f.debug_struct("KeyFile").field("key_file", key_file).finish()
            }
        }
    }
}

fn default_port() -> u16 {
    5000
}

fn default_fanout_limit() -> usize {
    relay_push::DEFAULT_FANOUT_LIMIT
}

fn default_fcm_base_url() -> String {
    relay_push::DEFAULT_FCM_BASE_URL.to_string()
}

impl Config {
    /// Load from `$FCM_RELAY_CONFIG` (or `relay.toml`), then apply `PORT`.
    ///
    /// A missing default file means built-in defaults; a missing file named
    /// explicitly through the environment is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if explicit.is_some() {
            return Err(ConfigError::NotFound(path));
        } else {
            Self::default()
        };

        config.apply_port_override(std::env::var("PORT").ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_port_override(&mut self, port: Option<String>) -> Result<(), ConfigError> {
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        Ok(())
    }

    /// Build the credential provider for the configured secret.
    pub fn credential_provider(&self) -> Result<ServiceAccountAuth, AuthError> {
        match &self.credentials {
            CredentialsConfig::KeyFile { key_file } => ServiceAccountAuth::from_key_file(key_file),
            CredentialsConfig::Inline {
                client_email,
                private_key,
                token_uri,
            } => {
                let auth = ServiceAccountAuth::from_inline(client_email.clone(), private_key)?;
                Ok(match token_uri {
                    Some(uri) => auth.with_token_uri(uri.clone()),
                    None => auth,
                })
            }
        }
    }

    /// Configured project ID, falling back to the one in the key file.
    pub fn resolve_project_id(&self, from_key: Option<&str>) -> Result<String, ConfigError> {
        self.project_id
            .clone()
            .or_else(|| from_key.map(str::to_string))
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingProjectId)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            project_id: None,
            fanout_limit: default_fanout_limit(),
            fcm_base_url: default_fcm_base_url(),
            credentials: CredentialsConfig::default(),
        }
    }
}
