//! Delivery result types.

use serde::Serialize;
use serde_json::Value;

use crate::DeviceToken;

/// Outcome of sending to one target.
#[derive(Debug, Clone, Serialize)]
pub struct RelayResult {
    pub token: DeviceToken,
    pub success: bool,
    /// Upstream response body (if successful).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Upstream error body or message (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl RelayResult {
    /// Create a successful result.
    pub fn success(token: DeviceToken, response: Value) -> Self {
        Self {
            token,
            success: true,
            response: Some(response),
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failure(token: DeviceToken, error: Value) -> Self {
        Self {
            token,
            success: false,
            response: None,
            error: Some(error),
        }
    }
}

/// Aggregated outcome of a multicast send.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MulticastSummary {
    pub results: Vec<RelayResult>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl MulticastSummary {
    pub fn new(results: Vec<RelayResult>) -> Self {
        let success_count = results.iter().filter(|r| r.success).count();
        let failure_count = results.len() - success_count;
        Self {
            results,
            success_count,
            failure_count,
        }
    }
}
