//! Relay Push Delivery
//!
//! FCM HTTP v1 delivery and the relay service that ties credentials,
//! message composition and fan-out together.

mod error;
mod fcm;
mod service;
mod traits;

pub use error::*;
pub use fcm::*;
pub use service::*;
pub use traits::*;
