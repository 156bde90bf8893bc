use std::sync::Arc;

use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Errors surfaced by the multi-RPC access layer.
///
/// `Error` values are returned by [`MultiRpcProviderBuilder::build`] and by every
/// call routed through the pool. Per-endpoint failures are recovered internally
/// by rotation and only reach the caller as [`Error::AllProvidersFailed`] once
/// the whole pool has been exhausted for one logical operation.
///
/// [`MultiRpcProviderBuilder::build`]: crate::MultiRpcProviderBuilder::build
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The pool was given zero endpoints at construction.
    #[error("at least one RPC endpoint must be configured")]
    EmptyPool,

    /// The configured rotation threshold is invalid (must be greater than zero).
    #[error("rotation threshold must be greater than 0")]
    InvalidRotationThreshold,

    /// The configured chunk size is invalid (must be greater than zero).
    #[error("chunk size must be greater than 0")]
    InvalidChunkSize,

    /// The configured subscription buffer capacity is invalid (must be greater
    /// than zero).
    #[error("subscription buffer capacity must be greater than 0")]
    InvalidBufferCapacity,

    /// A manual provider switch targeted an index outside the pool.
    ///
    /// The pool's state is unchanged when this is returned.
    #[error("provider index {index} is out of range, pool holds {len} endpoints")]
    OutOfRange { index: usize, len: usize },

    /// Every endpoint in the pool failed for one logical operation.
    ///
    /// Wraps the last underlying endpoint failure for diagnosis. `attempts` is
    /// the number of distinct endpoints tried, which always equals the pool
    /// size.
    #[error("all {attempts} RPC providers failed: {source}")]
    AllProvidersFailed {
        attempts: usize,
        #[source]
        source: EndpointError,
    },

    /// An endpoint failed while being connected.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// A single endpoint's failure.
///
/// Recovered locally by rotating to the next endpoint; callers only observe it
/// as the `source` of [`Error::AllProvidersFailed`] or as a connection failure
/// at build time.
#[derive(Error, Debug, Clone)]
pub enum EndpointError {
    /// The per-call timeout elapsed before the endpoint answered.
    #[error("operation timed out")]
    Timeout,

    /// The underlying RPC transport returned an error.
    #[error("RPC error: {0}")]
    Rpc(Arc<RpcError<TransportErrorKind>>),
}

impl From<RpcError<TransportErrorKind>> for EndpointError {
    fn from(error: RpcError<TransportErrorKind>) -> Self {
        EndpointError::Rpc(Arc::new(error))
    }
}

impl From<tokio::time::error::Elapsed> for EndpointError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        EndpointError::Timeout
    }
}
