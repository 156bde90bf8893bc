use alloy::rpc::types::Log;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to one live log subscription.
///
/// Batches arrive via [`recv`](Self::recv). The endpoint chosen at watch time
/// is pinned for the life of the subscription and does not follow later pool
/// rotations. At most one transport subscription backs the handle.
///
/// Dropping the handle tears the subscription down as if
/// [`cleanup`](Self::cleanup) had been called.
#[derive(Debug)]
pub struct EventSubscription {
    receiver: mpsc::Receiver<Vec<Log>>,
    cancel: CancellationToken,
    endpoint_url: String,
}

impl EventSubscription {
    pub(crate) fn new(
        receiver: mpsc::Receiver<Vec<Log>>,
        cancel: CancellationToken,
        endpoint_url: String,
    ) -> Self {
        Self { receiver, cancel, endpoint_url }
    }

    /// Receives the next batch of matching logs.
    ///
    /// Returns `None` once the subscription has been cleaned up or the
    /// transport side has shut down. Batches buffered before a `cleanup` call
    /// are discarded, not delivered.
    pub async fn recv(&mut self) -> Option<Vec<Log>> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            () = self.cancel.cancelled() => None,
            batch = self.receiver.recv() => batch,
        }
    }

    /// Tears the subscription down: stops delivery and unsubscribes from the
    /// transport.
    ///
    /// Idempotent; a second call is a no-op.
    pub fn cleanup(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        debug!(url = %self.endpoint_url, "cleaning up event subscription");
        self.cancel.cancel();
    }

    /// Whether the subscription is still delivering.
    ///
    /// Turns `false` after [`cleanup`](Self::cleanup) and when the transport
    /// side shuts down on its own.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// URL of the endpoint this subscription is pinned to.
    #[must_use]
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription_pair(capacity: usize) -> (mpsc::Sender<Vec<Log>>, EventSubscription) {
        let (sender, receiver) = mpsc::channel(capacity);
        let cancel = CancellationToken::new();
        (sender, EventSubscription::new(receiver, cancel, "mock://pinned".to_owned()))
    }

    #[tokio::test]
    async fn delivers_batches_until_sender_is_dropped() {
        let (sender, mut subscription) = subscription_pair(8);

        sender.send(vec![Log::default()]).await.unwrap();
        sender.send(vec![Log::default(), Log::default()]).await.unwrap();
        drop(sender);

        assert_eq!(subscription.recv().await.map(|batch| batch.len()), Some(1));
        assert_eq!(subscription.recv().await.map(|batch| batch.len()), Some(2));
        assert_eq!(subscription.recv().await, None);
    }

    #[tokio::test]
    async fn cleanup_is_idempotent_and_discards_buffered_batches() {
        let (sender, mut subscription) = subscription_pair(8);
        sender.send(vec![Log::default()]).await.unwrap();

        subscription.cleanup();
        subscription.cleanup();

        assert!(!subscription.is_active());
        assert_eq!(subscription.recv().await, None);
    }

    #[tokio::test]
    async fn drop_cancels_the_token() {
        let (sender, receiver) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let observer = cancel.clone();

        let subscription = EventSubscription::new(receiver, cancel, "mock://pinned".to_owned());
        assert!(!observer.is_cancelled());

        drop(subscription);
        assert!(observer.is_cancelled());
        drop(sender);
    }

    #[tokio::test]
    async fn reports_pinned_endpoint() {
        let (_sender, subscription) = subscription_pair(1);
        assert_eq!(subscription.endpoint_url(), "mock://pinned");
        assert!(subscription.is_active());
    }
}
