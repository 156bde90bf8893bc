//! The client facade and its resilient caller.
//!
//! [`MultiRpcProvider`] wraps a [`ProviderPool`](crate::ProviderPool) and
//! routes every operation through
//! [`safe_call`](MultiRpcProvider::safe_call), which retries across distinct
//! endpoints until one succeeds or the pool is exhausted. Construct it with
//! [`MultiRpcProviderBuilder`].

mod builder;
mod ens;
mod provider;

pub use builder::{
    DEFAULT_CALL_TIMEOUT, DEFAULT_CHUNK_DELAY, DEFAULT_ROTATION_THRESHOLD,
    DEFAULT_SUBSCRIPTION_BUFFER_CAPACITY, MultiRpcProviderBuilder, RPC_URLS_ENV,
};
pub use provider::MultiRpcProvider;
