//! Request bodies and their validation.

use relay_core::{DeviceToken, Notification};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ApiError;

/// Register request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// Single-send request.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

/// Multicast request.
#[derive(Debug, Deserialize)]
pub struct MulticastRequest {
    /// Kept loose so a non-array value is a validation error, not a parse error.
    #[serde(default)]
    pub tokens: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

impl RegisterRequest {
    pub fn validate(self) -> Result<DeviceToken, ApiError> {
        present(self.token)
            .map(DeviceToken::from)
            .ok_or(ApiError::Validation("Token is required"))
    }
}

impl SendRequest {
    pub fn validate(self) -> Result<(DeviceToken, Notification), ApiError> {
        match (present(self.token), present(self.title), present(self.body)) {
            (Some(token), Some(title), Some(body)) => Ok((
                DeviceToken::from(token),
                Notification::new(title, body).with_data(self.data),
            )),
            _ => Err(ApiError::Validation("Token, title and body are required")),
        }
    }
}

impl MulticastRequest {
    pub fn validate(self) -> Result<(Vec<DeviceToken>, Notification), ApiError> {
        let tokens = parse_tokens(self.tokens)
            .ok_or(ApiError::Validation("Valid tokens array is required"))?;

        match (present(self.title), present(self.body)) {
            (Some(title), Some(body)) => {
                Ok((tokens, Notification::new(title, body).with_data(self.data)))
            }
            _ => Err(ApiError::Validation("Title and body are required")),
        }
    }
}

/// Non-empty array of strings, or nothing.
fn parse_tokens(value: Option<Value>) -> Option<Vec<DeviceToken>> {
    let Value::Array(items) = value? else {
        return None;
    };
    if items.is_empty() {
        return None;
    }

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Some(DeviceToken::from(s)),
            _ => None,
        })
        .collect()
}
