//! Relay Credentials
//!
//! Service-account loading and OAuth2 access-token exchange for the FCM API.

mod error;
mod key;
mod provider;

pub use error::AuthError;
pub use key::*;
pub use provider::*;
