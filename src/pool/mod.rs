//! Endpoint pool with deterministic rotation.
//!
//! [`ProviderPool`] owns an ordered, non-empty set of [`Endpoint`]s and tracks
//! which one is active. The active endpoint advances in two ways:
//!
//! * **failure rotation**: the resilient caller invokes [`ProviderPool::rotate`]
//!   after a failed attempt, so the next attempt lands on a different provider;
//! * **threshold rotation**: [`ProviderPool::record_success`] counts successful
//!   requests and rotates once the configured threshold is reached, spreading
//!   load across providers even when nothing fails.
//!
//! Both paths reset the request counter; they never compound.
//!
//! The pool is a cheap-to-clone handle (`Arc` inside). Its mutable state sits
//! behind a single mutex; critical sections are a few integer operations, so
//! holding a blocking lock inside async code is fine here.

mod endpoint;

use std::sync::{Arc, Mutex, MutexGuard};

use alloy::network::{Ethereum, Network};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Error;

pub use endpoint::{Endpoint, IntoEndpoint};

/// Ordered collection of RPC endpoints with an active cursor.
///
/// Constructed once at startup and shared by handle for the process lifetime.
/// All state transitions go through [`rotate`](Self::rotate),
/// [`record_success`](Self::record_success) and
/// [`set_current`](Self::set_current); the endpoint list itself never changes.
#[derive(Debug)]
pub struct ProviderPool<N: Network = Ethereum> {
    inner: Arc<PoolInner<N>>,
}

impl<N: Network> Clone for ProviderPool<N> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

#[derive(Debug)]
struct PoolInner<N: Network> {
    endpoints: Vec<Endpoint<N>>,
    rotation_threshold: u32,
    state: Mutex<PoolState>,
}

#[derive(Debug)]
struct PoolState {
    current_index: usize,
    request_count: u32,
}

impl<N: Network> ProviderPool<N> {
    /// Creates a pool over `endpoints`, starting at index 0.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyPool`] if `endpoints` is empty.
    /// * [`Error::InvalidRotationThreshold`] if `rotation_threshold` is zero.
    pub fn new(endpoints: Vec<Endpoint<N>>, rotation_threshold: u32) -> Result<Self, Error> {
        if endpoints.is_empty() {
            return Err(Error::EmptyPool);
        }
        if rotation_threshold == 0 {
            return Err(Error::InvalidRotationThreshold);
        }

        info!(
            endpoint_count = endpoints.len(),
            rotation_threshold, "initializing provider pool"
        );

        Ok(Self {
            inner: Arc::new(PoolInner {
                endpoints,
                rotation_threshold,
                state: Mutex::new(PoolState { current_index: 0, request_count: 0 }),
            }),
        })
    }

    /// Returns the currently active endpoint.
    ///
    /// Never fails: the pool is guaranteed non-empty and the cursor always
    /// indexes a valid endpoint.
    #[must_use]
    pub fn current(&self) -> Endpoint<N> {
        let state = self.state();
        self.inner.endpoints[state.current_index].clone()
    }

    /// Number of endpoints in the pool.
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.inner.endpoints.len()
    }

    /// The configured success-count rotation threshold.
    #[must_use]
    pub fn rotation_threshold(&self) -> u32 {
        self.inner.rotation_threshold
    }

    /// Advances the cursor to the next endpoint and resets the request
    /// counter.
    pub fn rotate(&self) {
        let mut state = self.state();
        let previous = state.current_index;
        state.current_index = (state.current_index + 1) % self.inner.endpoints.len();
        state.request_count = 0;
        debug!(previous, current = state.current_index, "rotated to next provider");
    }

    /// Records one successful request, rotating once the threshold is hit.
    ///
    /// A pool of one endpoint still counts and resets, but the rotation is an
    /// unobservable no-op.
    pub fn record_success(&self) {
        let mut state = self.state();
        state.request_count += 1;
        if state.request_count >= self.inner.rotation_threshold {
            let previous = state.current_index;
            state.current_index = (state.current_index + 1) % self.inner.endpoints.len();
            state.request_count = 0;
            debug!(
                previous,
                current = state.current_index,
                "rotation threshold reached, rotated to next provider"
            );
        }
    }

    /// Manually switches the active endpoint.
    ///
    /// Intended for operational control (and tests). Resets the request
    /// counter on success.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `index` does not address an endpoint; the pool
    /// state is left untouched.
    pub fn set_current(&self, index: usize) -> Result<(), Error> {
        let len = self.inner.endpoints.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }

        let mut state = self.state();
        let previous = state.current_index;
        state.current_index = index;
        state.request_count = 0;
        info!(previous, current = index, "manually switched provider");
        Ok(())
    }

    /// Diagnostic snapshot for monitoring.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let state = self.state();
        PoolStatus {
            current_index: state.current_index,
            total_providers: self.inner.endpoints.len(),
            request_count: state.request_count,
            next_rotation_in: self.inner.rotation_threshold - state.request_count,
            rpc_urls: self.inner.endpoints.iter().map(|e| e.url().to_owned()).collect(),
        }
    }

    fn state(&self) -> MutexGuard<'_, PoolState> {
        self.inner.state.lock().expect("pool state lock poisoned")
    }
}

/// Point-in-time view of the pool's rotation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    /// Index of the active endpoint.
    pub current_index: usize,
    /// Total number of configured endpoints.
    pub total_providers: usize,
    /// Successful requests recorded since the last rotation.
    pub request_count: u32,
    /// Successful requests remaining before the next threshold rotation.
    pub next_rotation_in: u32,
    /// Configured endpoint URLs, in pool order.
    pub rpc_urls: Vec<String>,
}
