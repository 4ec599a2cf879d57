//! Relay HTTP Layer
//!
//! Axum handlers for device registration and FCM send endpoints.

mod error;
mod handlers;
mod middleware;
mod request;

pub use error::*;
pub use handlers::*;
pub use middleware::*;
pub use request::*;

use axum::Router;
use relay_auth::TokenProvider;
use relay_push::{PushService, Pusher};
use relay_storage::TokenStore;

/// Create the relay router.
pub fn relay_router<A, P, S>(push: PushService<A, P>, store: S) -> Router
where
    A: TokenProvider + 'static,
    P: Pusher + 'static,
    S: TokenStore + Clone + 'static,
{
    use axum::routing::post;

    Router::new()
        .route("/register", post(handlers::register::<A, P, S>))
        .route("/send-notification", post(handlers::send_notification::<A, P, S>))
        .route("/send-multicast", post(handlers::send_multicast::<A, P, S>))
        .layer(axum::middleware::from_fn(logging_middleware))
        .with_state(AppState::new(push, store))
}
