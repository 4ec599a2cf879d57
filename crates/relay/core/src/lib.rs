//! Relay Core Types
//!
//! Device tokens, notifications, the FCM message envelope and per-target
//! delivery results.

mod message;
mod result;
mod token;

pub use message::*;
pub use result::*;
pub use token::*;
