//! Relay service: credentials, composition and fan-out.

use futures::StreamExt as _;
use relay_auth::{AccessToken, AuthError, TokenProvider};
use relay_core::{DeviceToken, MulticastSummary, Notification, RelayResult, compose};
use serde_json::Value;

use crate::{Pusher, RelayError};

/// Default number of multicast sends in flight at once.
pub const DEFAULT_FANOUT_LIMIT: usize = 32;

/// Sends notifications through FCM with a fresh access token per request.
pub struct PushService<A, P> {
    auth: A,
    pusher: P,
    fanout_limit: usize,
}

impl<A, P> PushService<A, P>
where
    A: TokenProvider,
    P: Pusher,
{
    /// Create a new push service.
    pub fn new(auth: A, pusher: P) -> Self {
        Self {
            auth,
            pusher,
            fanout_limit: DEFAULT_FANOUT_LIMIT,
        }
    }

    /// Cap concurrent sends during multicast. Zero is treated as one.
    pub fn with_fanout_limit(mut self, limit: usize) -> Self {
        self.fanout_limit = limit.max(1);
        self
    }

    pub fn fanout_limit(&self) -> usize {
        self.fanout_limit
    }

    /// Send one notification to one device.
    pub async fn send(
        &self,
        token: &DeviceToken,
        notification: &Notification,
    ) -> Result<Value, RelayError> {
        let access_token = self.auth.access_token().await?;
        let envelope = compose(token, notification);
        let response = self.pusher.push(&access_token, &envelope).await?;

        tracing::info!(token = %token, "sent message");
        Ok(response)
    }

    /// Send the same notification to every token.
    ///
    /// One access token is shared by all sends. Per-target failures land in
    /// the summary; only credential failure aborts the whole call. Results
    /// keep the order of `tokens`.
    pub async fn send_multicast(
        &self,
        tokens: &[DeviceToken],
        notification: &Notification,
    ) -> Result<MulticastSummary, AuthError> {
        let access_token = self.auth.access_token().await?;

        // Futures are built up front so the stream owns them outright; a
        // stream borrowing each token is not `Send` for every lifetime.
        let sends: Vec<_> = tokens
            .iter()
            .map(|token| self.deliver(&access_token, token, notification))
            .collect();

        let results: Vec<RelayResult> = futures::stream::iter(sends)
            .buffered(self.fanout_limit)
            .collect()
            .await;

        let summary = MulticastSummary::new(results);
        tracing::info!(
            success = summary.success_count,
            failure = summary.failure_count,
            "multicast results"
        );

        Ok(summary)
    }

    async fn deliver(
        &self,
        access_token: &AccessToken,
        token: &DeviceToken,
        notification: &Notification,
    ) -> RelayResult {
        let envelope = compose(token, notification);

        match self.pusher.push(access_token, &envelope).await {
            Ok(response) => RelayResult::success(token.clone(), response),
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "multicast target failed");
                RelayResult::failure(token.clone(), e.details())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use relay_core::Envelope;
    use serde_json::json;

    use super::*;
    use crate::UpstreamError;

    #[derive(Default)]
    struct CountingAuth {
        calls: AtomicUsize,
        fail: bool,
    }

    impl TokenProvider for CountingAuth {
        async fn access_token(&self) -> Result<AccessToken, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AuthError::MalformedKey("bad key".into()));
            }
            Ok(AccessToken::new("ya29.test"))
        }
    }

    /// Fails for tokens starting with "bad". Earlier sends sleep longer
    /// so completion order differs from input order.
    #[derive(Default)]
    struct FakePusher {
        sent: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl Pusher for FakePusher {
        async fn push(
            &self,
            _token: &AccessToken,
            envelope: &Envelope,
        ) -> Result<Value, UpstreamError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            let n = self.sent.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(n as u64 * 3))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let token = envelope.message.token.as_str();
            if token.starts_with("bad") {
                Err(UpstreamError::Rejected {
                    status: 400,
                    body: json!({"error": {"status": "INVALID_ARGUMENT"}}),
                })
            } else {
                Ok(json!({"name": format!("projects/demo/messages/{token}")}))
            }
        }
    }

    fn require_send<F: std::future::Future + Send>(future: F) -> F {
        future
    }

    /// Compiles only if the multicast future is `Send` for any provider and
    /// pusher, which axum requires of handler futures.
    #[allow(dead_code)]
    fn multicast_future_is_send<A: TokenProvider, P: Pusher>(
        service: &PushService<A, P>,
        tokens: &[DeviceToken],
        notification: &Notification,
    ) -> impl std::future::Future<Output = Result<MulticastSummary, AuthError>> + Send {
        require_send(service.send_multicast(tokens, notification))
    }

    fn tokens(raw: &[&str]) -> Vec<DeviceToken> {
        raw.iter().map(|t| DeviceToken::from(*t)).collect()
    }

    #[tokio::test]
    async fn test_send_fetches_fresh_token_each_time() {
        let service = PushService::new(CountingAuth::default(), FakePusher::default());
        let notification = Notification::new("Hi", "There");

        service.send(&"a".into(), &notification).await.unwrap();
        service.send(&"b".into(), &notification).await.unwrap();
        assert_eq!(service.auth.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_send_surfaces_upstream_error() {
        let service = PushService::new(CountingAuth::default(), FakePusher::default());

        let err = service
            .send(&"bad-1".into(), &Notification::new("Hi", "There"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Upstream(_)));
        assert_eq!(err.details()["error"]["status"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_multicast_isolates_failures_and_keeps_order() {
        let service = PushService::new(CountingAuth::default(), FakePusher::default());

        let summary = service
            .send_multicast(&tokens(&["a", "bad-b"]), &Notification::new("Hi", "There"))
            .await
            .unwrap();

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[0].token.as_str(), "a");
        assert!(summary.results[0].success);
        assert_eq!(summary.results[1].token.as_str(), "bad-b");
        assert!(!summary.results[1].success);
        assert_eq!(service.auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_multicast_respects_fanout_limit() {
        let service =
            PushService::new(CountingAuth::default(), FakePusher::default()).with_fanout_limit(2);
        let input = tokens(&["t0", "t1", "bad-t2", "t3", "t4", "t5"]);

        let summary = service
            .send_multicast(&input, &Notification::new("Hi", "There"))
            .await
            .unwrap();

        let order: Vec<&DeviceToken> = summary.results.iter().map(|r| &r.token).collect();
        assert_eq!(order, input.iter().collect::<Vec<_>>());
        assert_eq!(summary.failure_count, 1);
        assert!(service.pusher.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_multicast_auth_failure_sends_nothing() {
        let auth = CountingAuth {
            fail: true,
            ..Default::default()
        };
        let service = PushService::new(auth, FakePusher::default());

        let err = service
            .send_multicast(&tokens(&["a", "b"]), &Notification::new("Hi", "There"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedKey(_)));
        assert_eq!(service.pusher.sent.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_fanout_limit_is_clamped() {
        let service =
            PushService::new(CountingAuth::default(), FakePusher::default()).with_fanout_limit(0);
        assert_eq!(service.fanout_limit(), 1);
    }
}
