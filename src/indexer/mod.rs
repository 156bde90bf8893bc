//! Chunked historical log retrieval.
//!
//! [`LogIndexer::fetch_logs`] decomposes a block-range query into bounded
//! windows (see [`ChunkPlan`]) and issues them sequentially through the
//! pool's failover, pausing between successful fetches to stay under provider
//! rate limits.
//!
//! Indexing is best-effort: a window that fails even after every endpoint was
//! tried is logged and skipped, and the call still returns the logs of all
//! surviving windows. Callers that need a lost window re-issue `fetch_logs`
//! over a narrower range.

mod chunk_plan;

use std::{ops::RangeInclusive, time::Duration};

use alloy::{
    network::{Ethereum, Network},
    providers::Provider,
    rpc::types::{Filter, Log},
};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{error::Error, filter::EventFilter, provider::MultiRpcProvider};

pub use chunk_plan::{ChunkPlan, DEFAULT_CHUNK_SIZE};

/// Block range selector for historical queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRange {
    /// Look back `n` blocks from the chain head at call time.
    Lookback(u64),
    /// Explicit inclusive bounds, used verbatim (not validated against the
    /// chain head).
    Span { from: u64, to: u64 },
}

impl From<u64> for BlockRange {
    fn from(depth: u64) -> Self {
        BlockRange::Lookback(depth)
    }
}

impl From<(u64, u64)> for BlockRange {
    fn from((from, to): (u64, u64)) -> Self {
        BlockRange::Span { from, to }
    }
}

impl From<RangeInclusive<u64>> for BlockRange {
    fn from(range: RangeInclusive<u64>) -> Self {
        BlockRange::Span { from: *range.start(), to: *range.end() }
    }
}

/// Fetches historical logs in bounded chunks through the pool.
#[derive(Debug, Clone)]
pub struct LogIndexer<N: Network = Ethereum> {
    provider: MultiRpcProvider<N>,
    chunk_size: u64,
    chunk_delay: Duration,
}

impl<N: Network> LogIndexer<N> {
    /// Creates an indexer sharing `provider`'s pool and tuning.
    #[must_use]
    pub fn new(provider: MultiRpcProvider<N>) -> Self {
        let chunk_size = provider.chunk_size;
        let chunk_delay = provider.chunk_delay;
        Self { provider, chunk_size, chunk_delay }
    }

    /// Fetches all logs matching `filter` over `range`.
    ///
    /// A [`BlockRange::Lookback`] is resolved against the chain head at call
    /// time; an explicit span is used verbatim. The resolved range is split
    /// into windows of at most the configured chunk size and fetched
    /// sequentially, each window going through the pool's failover. Results
    /// are concatenated in ascending block order.
    ///
    /// Windows that fail after exhausting every endpoint are skipped (logged
    /// at `warn`), so the result may be partial.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] only if the chain-head resolution for a
    /// lookback range fails. Chunk failures never abort the call.
    pub async fn fetch_logs(
        &self,
        filter: &EventFilter,
        range: impl Into<BlockRange>,
    ) -> Result<Vec<Log>, Error> {
        let (from, to) = self.resolve(range.into()).await?;
        let base = Filter::from(filter);

        let plan = ChunkPlan::new(from, to, self.chunk_size);
        let total_chunks = plan.total_chunks();
        debug!(from, to, total_chunks, chunk_size = self.chunk_size, "starting chunked log fetch");

        let mut logs = Vec::new();
        for (index, window) in plan.enumerate() {
            let window_filter =
                base.clone().from_block(*window.start()).to_block(*window.end());
            let window_filter = &window_filter;

            match self
                .provider
                .safe_call(move |endpoint| async move {
                    endpoint.provider().get_logs(window_filter).await
                })
                .await
            {
                Ok(chunk) => {
                    debug!(
                        from = *window.start(),
                        to = *window.end(),
                        count = chunk.len(),
                        "fetched chunk"
                    );
                    logs.extend(chunk);

                    let is_last = index as u64 + 1 == total_chunks;
                    if !is_last && !self.chunk_delay.is_zero() {
                        sleep(self.chunk_delay).await;
                    }
                }
                Err(error) => {
                    // The window's logs are lost for this call; no pause after
                    // a failure.
                    warn!(
                        from = *window.start(),
                        to = *window.end(),
                        error = %error,
                        "skipping block window after exhausting all providers"
                    );
                }
            }
        }

        debug!(total_logs = logs.len(), "chunked log fetch finished");
        Ok(logs)
    }

    async fn resolve(&self, range: BlockRange) -> Result<(u64, u64), Error> {
        match range {
            BlockRange::Span { from, to } => Ok((from, to)),
            BlockRange::Lookback(depth) => {
                let head = self.provider.get_block_number().await?;
                Ok((head.saturating_sub(depth), head))
            }
        }
    }
}
