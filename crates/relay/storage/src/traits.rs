//! Storage traits.

use relay_core::DeviceToken;

/// Device token registry.
pub trait TokenStore: Send + Sync {
    /// Register a token. Returns `true` if it was not already present.
    fn register(&self, token: &DeviceToken) -> color_eyre::eyre::Result<bool>;

    /// Check whether a token is registered.
    fn contains(&self, token: &DeviceToken) -> color_eyre::eyre::Result<bool>;

    /// Number of registered tokens.
    fn count(&self) -> color_eyre::eyre::Result<usize>;
}
