//! multi-rpc is a resilient multi-endpoint JSON-RPC access layer for EVM
//! chains.
//!
//! The main entry point is [`MultiRpcProvider`], built via
//! [`MultiRpcProviderBuilder`] from an ordered list of redundant endpoint
//! URLs. Every call is routed through one failover loop: it runs against the
//! pool's active endpoint and, on failure, rotates to the next one until an
//! endpoint succeeds or the whole pool has been tried. Successful requests
//! are counted, and after a configurable threshold the pool rotates anyway,
//! so traffic is never pinned to a single provider indefinitely.
//!
//! # Historical indexing
//!
//! [`MultiRpcProvider::fetch_logs`] retrieves event logs across arbitrarily
//! large block ranges by splitting them into bounded chunks (500 blocks by
//! default, the limit of the stricter public providers) and fetching them
//! sequentially with a short pause in between. Indexing is best-effort: a
//! chunk that fails on every endpoint is logged and skipped, and
//! the call returns the logs of all surviving chunks in ascending block
//! order. Gap-filling is the caller's responsibility via a narrower re-fetch.
//!
//! # Live watching
//!
//! [`MultiRpcProvider::watch`] opens a log subscription through the same
//! failover and returns an [`EventSubscription`]. The endpoint that accepted
//! the subscription is pinned for its lifetime; if it stops delivering, the
//! stream ends rather than silently re-subscribing elsewhere.
//! [`EventSubscription::cleanup`] tears the subscription down and is
//! idempotent.
//!
//! # Observability
//!
//! [`MultiRpcProvider::status`] exposes a [`PoolStatus`] snapshot (active
//! index, request count, next rotation, configured URLs) for monitoring.
//! Internals log through [`tracing`].
//!
//! # Example
//!
//! ```rust,no_run
//! use multi_rpc::{EventFilter, MultiRpcProviderBuilder};
//! use alloy::primitives::address;
//!
//! # async fn example() -> Result<(), multi_rpc::Error> {
//! let provider = MultiRpcProviderBuilder::new()
//!     .endpoint("wss://eth-mainnet.example/ws")
//!     .endpoint("https://eth-mainnet.backup.example")
//!     .rotation_threshold(100)
//!     .build()
//!     .await?;
//!
//! let filter = EventFilter::new()
//!     .contract_address(address!("0xd8dA6BF26964af9d7eed9e03e53415d37aa96045"))
//!     .event("OrderFulfilled(bytes32,address,address)");
//!
//! // Index the last 100k blocks, then follow new events live.
//! let history = provider.fetch_logs(&filter, 100_000u64).await?;
//! println!("indexed {} past sales", history.len());
//!
//! let mut subscription = provider.watch(&filter).await?;
//! while let Some(batch) = subscription.recv().await {
//!     println!("received {} new logs", batch.len());
//! }
//! subscription.cleanup();
//! # Ok(())
//! # }
//! ```

pub mod indexer;
pub mod pool;
pub mod provider;
pub mod watcher;

mod error;
mod filter;

pub use error::{EndpointError, Error};
pub use filter::EventFilter;

pub use indexer::{BlockRange, ChunkPlan, DEFAULT_CHUNK_SIZE, LogIndexer};
pub use pool::{Endpoint, IntoEndpoint, PoolStatus, ProviderPool};
pub use provider::{
    DEFAULT_CALL_TIMEOUT, DEFAULT_CHUNK_DELAY, DEFAULT_ROTATION_THRESHOLD,
    DEFAULT_SUBSCRIPTION_BUFFER_CAPACITY, MultiRpcProvider, MultiRpcProviderBuilder, RPC_URLS_ENV,
};
pub use watcher::{EventSubscription, EventWatcher};
