//! Push notification traits.

use relay_auth::AccessToken;
use relay_core::Envelope;
use serde_json::Value;

use crate::UpstreamError;

/// Low-level sender for one composed message.
#[trait_variant::make(Send)]
pub trait Pusher: Send + Sync {
    /// Send a message, returning the upstream response body.
    async fn push(&self, token: &AccessToken, envelope: &Envelope)
    -> Result<Value, UpstreamError>;
}
