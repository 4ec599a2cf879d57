//! Relay Storage Layer
//!
//! Device token registry behind a store trait.

mod memory;
mod traits;

pub use memory::MemoryStorage;
pub use traits::*;
