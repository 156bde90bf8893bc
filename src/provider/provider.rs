use std::time::Duration;

use alloy::{
    network::{Ethereum, Network},
    primitives::TxHash,
    providers::Provider,
    rpc::types::{Filter, Log},
    transports::{RpcError, TransportErrorKind},
};
use tokio::time::timeout;
use tracing::{error, info, trace, warn};

use crate::{
    error::{EndpointError, Error},
    filter::EventFilter,
    indexer::{BlockRange, LogIndexer},
    pool::{Endpoint, PoolStatus, ProviderPool},
    watcher::{EventSubscription, EventWatcher},
};

/// Single facade over a pool of redundant RPC endpoints.
///
/// Every call goes through [`safe_call`](Self::safe_call), which fails over
/// across the pool and spreads load by rotating the active endpoint after a
/// configured number of successes. Cloning is cheap; clones share the same
/// pool state.
#[derive(Clone, Debug)]
pub struct MultiRpcProvider<N: Network = Ethereum> {
    pub(crate) pool: ProviderPool<N>,
    pub(crate) call_timeout: Duration,
    pub(crate) chunk_size: u64,
    pub(crate) chunk_delay: Duration,
    pub(crate) subscription_buffer_capacity: usize,
}

impl<N: Network> MultiRpcProvider<N> {
    /// The underlying endpoint pool.
    #[must_use]
    pub fn pool(&self) -> &ProviderPool<N> {
        &self.pool
    }

    /// Diagnostic snapshot of the pool's rotation state.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        self.pool.status()
    }

    /// Executes `operation` with automatic failover across the pool.
    ///
    /// The operation runs against the pool's active endpoint, wrapped in the
    /// per-call timeout. On success the pool records the request (which may
    /// trigger a threshold rotation for *subsequent* calls) and the result is
    /// returned. On failure the pool rotates and the operation is retried
    /// against the new active endpoint. Each endpoint is tried at most once
    /// per call, so the attempt count is bounded by the pool size.
    ///
    /// Because the active endpoint is re-read before every attempt, concurrent
    /// callers may interleave rotations; the operation must not assume two
    /// attempts land on related endpoints.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] once every endpoint has failed, wrapping
    /// the last underlying error.
    pub async fn safe_call<T, F, Fut>(&self, operation: F) -> Result<T, Error>
    where
        F: Fn(Endpoint<N>) -> Fut,
        Fut: Future<Output = Result<T, RpcError<TransportErrorKind>>>,
    {
        let attempts = self.pool.endpoint_count();
        let mut last_error: Option<EndpointError> = None;

        for attempt in 1..=attempts {
            let endpoint = self.pool.current();
            trace!(attempt, attempts, url = endpoint.url(), "attempting RPC call");

            match timeout(self.call_timeout, operation(endpoint.clone())).await {
                Ok(Ok(value)) => {
                    self.pool.record_success();
                    if attempt > 1 {
                        info!(attempt, url = endpoint.url(), "call succeeded after failover");
                    }
                    return Ok(value);
                }
                Ok(Err(err)) => {
                    warn!(
                        attempt,
                        attempts,
                        url = endpoint.url(),
                        error = %err,
                        "endpoint call failed"
                    );
                    last_error = Some(err.into());
                }
                Err(elapsed) => {
                    warn!(
                        attempt,
                        attempts,
                        url = endpoint.url(),
                        timeout = ?self.call_timeout,
                        "endpoint call timed out"
                    );
                    last_error = Some(elapsed.into());
                }
            }

            if attempt < attempts {
                self.pool.rotate();
            }
        }

        error!(attempts, "all RPC providers failed");
        // The pool is never empty, so the loop ran and recorded an error.
        let source = last_error.expect("pool holds at least one endpoint");
        Err(Error::AllProvidersFailed { attempts, source })
    }

    /// Fetch the latest block number with failover.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if every endpoint fails.
    pub async fn get_block_number(&self) -> Result<u64, Error> {
        trace!("eth_blockNumber called");
        self.safe_call(|endpoint| async move { endpoint.provider().get_block_number().await })
            .await
    }

    /// Fetch logs for a single, already-bounded [`Filter`] with failover.
    ///
    /// For large historical ranges use [`fetch_logs`](Self::fetch_logs), which
    /// chunks the range to respect provider limits.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if every endpoint fails.
    pub async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>, Error> {
        trace!("eth_getLogs called");
        self.safe_call(move |endpoint| async move { endpoint.provider().get_logs(filter).await })
            .await
    }

    /// Fetch a transaction receipt by hash with failover.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if every endpoint fails.
    pub async fn get_transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<N::ReceiptResponse>, Error> {
        trace!("eth_getTransactionReceipt called");
        self.safe_call(move |endpoint| async move {
            endpoint.provider().get_transaction_receipt(hash).await
        })
        .await
    }

    /// Fetch a transaction by hash with failover.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if every endpoint fails.
    pub async fn get_transaction_by_hash(
        &self,
        hash: TxHash,
    ) -> Result<Option<N::TransactionResponse>, Error> {
        trace!("eth_getTransactionByHash called");
        self.safe_call(move |endpoint| async move {
            endpoint.provider().get_transaction_by_hash(hash).await
        })
        .await
    }

    /// A chunked historical log indexer sharing this provider's pool and
    /// tuning.
    #[must_use]
    pub fn indexer(&self) -> LogIndexer<N> {
        LogIndexer::new(self.clone())
    }

    /// A live event watcher sharing this provider's pool and tuning.
    #[must_use]
    pub fn watcher(&self) -> EventWatcher<N> {
        EventWatcher::new(self.clone())
    }

    /// Fetches historical logs matching `filter` over `range`, in bounded
    /// chunks. See [`LogIndexer::fetch_logs`].
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if the range's chain-head resolution
    /// fails; individual chunk failures degrade to a partial result instead of
    /// erroring.
    pub async fn fetch_logs(
        &self,
        filter: &EventFilter,
        range: impl Into<BlockRange>,
    ) -> Result<Vec<Log>, Error> {
        self.indexer().fetch_logs(filter, range).await
    }

    /// Opens a live subscription for logs matching `filter`. See
    /// [`EventWatcher::watch`].
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if no endpoint can open the subscription.
    pub async fn watch(&self, filter: &EventFilter) -> Result<EventSubscription, Error> {
        self.watcher().watch(filter).await
    }
}

impl MultiRpcProvider<Ethereum> {
    /// Fetches a transaction and decodes its calldata as a UTF-8 string.
    ///
    /// Inscription-style protocols store their payload (typically a `data:`
    /// URI) directly in transaction input. Returns `None` if the transaction
    /// is unknown or its input is empty or not valid UTF-8.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if every endpoint fails.
    pub async fn get_calldata_string(&self, hash: TxHash) -> Result<Option<String>, Error> {
        use alloy::consensus::Transaction as _;

        let transaction = self.get_transaction_by_hash(hash).await?;
        Ok(transaction.and_then(|tx| {
            String::from_utf8(tx.input().to_vec()).ok().filter(|data| !data.is_empty())
        }))
    }
}
