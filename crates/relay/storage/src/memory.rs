//! In-memory storage implementation.

use std::sync::Arc;

use dashmap::DashSet;
use relay_core::DeviceToken;

use crate::traits::TokenStore;

/// Process-lifetime token set. Clones share the same set.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tokens: Arc<DashSet<DeviceToken>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryStorage {
    fn register(&self, token: &DeviceToken) -> color_eyre::eyre::Result<bool> {
        let inserted = self.tokens.insert(token.clone());
        tracing::debug!(token = %token, inserted, "token registry insert");
        Ok(inserted)
    }

    fn contains(&self, token: &DeviceToken) -> color_eyre::eyre::Result<bool> {
        Ok(self.tokens.contains(token))
    }

    fn count(&self) -> color_eyre::eyre::Result<usize> {
        Ok(self.tokens.len())
    }
}
