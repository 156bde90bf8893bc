//! Live event watching over a pinned endpoint.
//!
//! [`EventWatcher::watch`] opens a log subscription through the pool's
//! failover and returns an [`EventSubscription`] fed by a background task.
//! Whichever endpoint accepted the subscription is pinned until teardown.
//!
//! There is no automatic re-subscription: if the pinned endpoint's
//! subscription closes or goes quiet, the stream simply ends. Re-watching
//! (and gap-filling via the indexer) is the consumer's decision.

mod subscription;

use alloy::{
    network::{Ethereum, Network},
    providers::Provider,
    rpc::types::Filter,
};
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::{error::Error, filter::EventFilter, provider::MultiRpcProvider};

pub use subscription::EventSubscription;

/// Opens live log subscriptions through the pool.
#[derive(Debug, Clone)]
pub struct EventWatcher<N: Network = Ethereum> {
    provider: MultiRpcProvider<N>,
    buffer_capacity: usize,
}

impl<N: Network> EventWatcher<N> {
    /// Creates a watcher sharing `provider`'s pool and tuning.
    #[must_use]
    pub fn new(provider: MultiRpcProvider<N>) -> Self {
        let buffer_capacity = provider.subscription_buffer_capacity;
        Self { provider, buffer_capacity }
    }

    /// Subscribes to logs matching `filter`.
    ///
    /// The subscription is opened against the pool's active endpoint, failing
    /// over like any other call; endpoints without pubsub support simply count
    /// as failed attempts. The endpoint that accepts the subscription is
    /// pinned for its lifetime.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if no endpoint can open the
    /// subscription.
    pub async fn watch(&self, filter: &EventFilter) -> Result<EventSubscription, Error> {
        let base = Filter::from(filter);
        let base = &base;

        let (endpoint_url, mut transport) = self
            .provider
            .safe_call(move |endpoint| async move {
                let subscription = endpoint.provider().subscribe_logs(base).await?;
                Ok((endpoint.url().to_owned(), subscription))
            })
            .await?;

        debug!(url = %endpoint_url, "opened log subscription");

        let (sender, receiver) = mpsc::channel(self.buffer_capacity);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            // Cancelling on exit marks the handle inactive however the loop
            // ends; dropping `transport` unsubscribes.
            let _teardown = task_cancel.clone().drop_guard();
            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => {
                        debug!("event subscription cancelled");
                        break;
                    }
                    received = transport.recv() => match received {
                        // Pubsub pushes logs one at a time, so each delivery
                        // republishes as a batch of one.
                        Ok(log) => {
                            if sender.send(vec![log]).await.is_err() {
                                debug!("subscription consumer dropped, stopping");
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "event subscription lagged, logs were dropped");
                        }
                        Err(RecvError::Closed) => {
                            error!("transport subscription closed, ending watch");
                            break;
                        }
                    }
                }
            }
        });

        Ok(EventSubscription::new(receiver, cancel, endpoint_url))
    }
}
