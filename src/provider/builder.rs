use std::{pin::Pin, time::Duration};

use alloy::network::{Ethereum, Network};
use tracing::{debug, info, trace};

use crate::{
    error::{EndpointError, Error},
    indexer::DEFAULT_CHUNK_SIZE,
    pool::{Endpoint, IntoEndpoint, ProviderPool},
    provider::MultiRpcProvider,
};

type BoxedEndpointFuture<N> =
    Pin<Box<dyn Future<Output = Result<Endpoint<N>, EndpointError>> + Send>>;

/// Default per-attempt timeout for RPC operations.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);
/// Default number of successful requests before the pool rotates to the next
/// endpoint.
pub const DEFAULT_ROTATION_THRESHOLD: u32 = 100;
/// Default pause between successful chunk fetches during historical indexing.
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(250);
/// Default live subscription channel capacity.
pub const DEFAULT_SUBSCRIPTION_BUFFER_CAPACITY: usize = 128;

/// Environment variable read by [`MultiRpcProviderBuilder::from_env`]:
/// a comma-separated list of endpoint URLs.
pub const RPC_URLS_ENV: &str = "RPC_URLS";

/// Builder for [`MultiRpcProvider`].
///
/// Collects endpoint sources and tuning knobs; endpoints are connected in
/// order on [`build`](Self::build). The first configured endpoint becomes the
/// initially active one.
pub struct MultiRpcProviderBuilder<N: Network = Ethereum> {
    endpoints: Vec<BoxedEndpointFuture<N>>,
    rotation_threshold: u32,
    call_timeout: Duration,
    chunk_size: u64,
    chunk_delay: Duration,
    subscription_buffer_capacity: usize,
}

impl<N: Network> Default for MultiRpcProviderBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Network> MultiRpcProviderBuilder<N> {
    /// Creates a builder with default settings and no endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoints: vec![],
            rotation_threshold: DEFAULT_ROTATION_THRESHOLD,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            subscription_buffer_capacity: DEFAULT_SUBSCRIPTION_BUFFER_CAPACITY,
        }
    }

    /// Creates a builder seeded with the endpoints listed in the
    /// [`RPC_URLS_ENV`] environment variable (comma-separated).
    ///
    /// A missing or empty variable leaves the builder without endpoints, so
    /// [`build`](Self::build) fails with [`Error::EmptyPool`].
    #[must_use]
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(urls) = std::env::var(RPC_URLS_ENV) {
            for url in urls.split(',').map(str::trim).filter(|url| !url.is_empty()) {
                builder = builder.endpoint(url.to_owned());
            }
        }
        builder
    }

    /// Adds an endpoint to the pool, in order.
    ///
    /// Accepts URL strings, parsed [`Url`](alloy::transports::http::reqwest::Url)s
    /// and pre-built [`Endpoint`]s.
    #[must_use]
    pub fn endpoint<E: IntoEndpoint<N> + Send + 'static>(mut self, endpoint: E) -> Self {
        self.endpoints.push(Box::pin(endpoint.into_endpoint()));
        self
    }

    /// Sets the number of successful requests after which the pool rotates to
    /// the next endpoint. Must be greater than 0.
    #[must_use]
    pub fn rotation_threshold(mut self, rotation_threshold: u32) -> Self {
        self.rotation_threshold = rotation_threshold;
        self
    }

    /// Sets the per-attempt timeout for RPC operations.
    #[must_use]
    pub fn call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Sets the maximum number of blocks per historical log query. Must be
    /// greater than 0.
    ///
    /// Defaults to [`DEFAULT_CHUNK_SIZE`], sized for the stricter public
    /// provider limits.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the pause inserted between successful chunk fetches.
    #[must_use]
    pub fn chunk_delay(mut self, chunk_delay: Duration) -> Self {
        self.chunk_delay = chunk_delay;
        self
    }

    /// Sets the live subscription channel capacity. Must be greater than 0.
    #[must_use]
    pub fn subscription_buffer_capacity(mut self, capacity: usize) -> Self {
        self.subscription_buffer_capacity = capacity;
        self
    }

    /// Connects all endpoints and builds the provider.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidRotationThreshold`], [`Error::InvalidChunkSize`] or
    ///   [`Error::InvalidBufferCapacity`] on zero-valued settings.
    /// * [`Error::EmptyPool`] if no endpoint was configured.
    /// * [`Error::Endpoint`] if any endpoint fails to connect.
    pub async fn build(self) -> Result<MultiRpcProvider<N>, Error> {
        if self.rotation_threshold == 0 {
            return Err(Error::InvalidRotationThreshold);
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        if self.subscription_buffer_capacity == 0 {
            return Err(Error::InvalidBufferCapacity);
        }

        debug!(
            endpoint_count = self.endpoints.len(),
            rotation_threshold = self.rotation_threshold,
            call_timeout = ?self.call_timeout,
            chunk_size = self.chunk_size,
            "building MultiRpcProvider"
        );

        let mut endpoints = Vec::with_capacity(self.endpoints.len());
        for (index, endpoint) in self.endpoints.into_iter().enumerate() {
            trace!(index, "connecting endpoint");
            endpoints.push(endpoint.await?);
        }

        let pool = ProviderPool::new(endpoints, self.rotation_threshold)?;
        info!(endpoint_count = pool.endpoint_count(), "MultiRpcProvider initialized");

        Ok(MultiRpcProvider {
            pool,
            call_timeout: self.call_timeout,
            chunk_size: self.chunk_size,
            chunk_delay: self.chunk_delay,
            subscription_buffer_capacity: self.subscription_buffer_capacity,
        })
    }
}
