use alloy::{
    network::{Ethereum, Network},
    providers::RootProvider,
    transports::http::reqwest::Url,
};

use crate::error::EndpointError;

/// One configured RPC provider connection.
///
/// An `Endpoint` binds a provider URL to its connected Alloy
/// [`RootProvider`]. It is immutable after construction and cheap to clone
/// (the provider handle is internally reference-counted), so the pool hands
/// out owned copies to callers.
#[derive(Clone, Debug)]
pub struct Endpoint<N: Network = Ethereum> {
    url: String,
    provider: RootProvider<N>,
}

impl<N: Network> Endpoint<N> {
    /// Binds an already-constructed provider to the URL it was built from.
    ///
    /// This is the injection seam for tests: a provider backed by a mocked
    /// transport can be wrapped with any label.
    #[must_use]
    pub fn new(url: impl Into<String>, provider: RootProvider<N>) -> Self {
        Self { url: url.into(), provider }
    }

    /// Connects to `url` (`http`, `https`, `ws` or `wss`).
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be constructed or, for
    /// WebSocket URLs, if the connection handshake fails.
    pub async fn connect(url: &str) -> Result<Self, EndpointError> {
        let provider = RootProvider::connect(url).await?;
        Ok(Self { url: url.to_owned(), provider })
    }

    /// The URL this endpoint was configured with.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The underlying provider handle.
    #[must_use]
    pub fn provider(&self) -> &RootProvider<N> {
        &self.provider
    }
}

/// Conversion trait for types that can be turned into an [`Endpoint`].
///
/// Used by [`MultiRpcProviderBuilder`](crate::MultiRpcProviderBuilder) to
/// accept URL strings, parsed [`Url`]s, and pre-built endpoints
/// interchangeably.
pub trait IntoEndpoint<N: Network = Ethereum> {
    /// Convert `self` into a connected [`Endpoint`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport cannot be constructed or
    /// connected.
    fn into_endpoint(self) -> impl Future<Output = Result<Endpoint<N>, EndpointError>> + Send;
}

impl<N: Network> IntoEndpoint<N> for Endpoint<N> {
    async fn into_endpoint(self) -> Result<Endpoint<N>, EndpointError> {
        Ok(self)
    }
}

impl<N: Network> IntoEndpoint<N> for &str {
    async fn into_endpoint(self) -> Result<Endpoint<N>, EndpointError> {
        Endpoint::connect(self).await
    }
}

impl<N: Network> IntoEndpoint<N> for String {
    async fn into_endpoint(self) -> Result<Endpoint<N>, EndpointError> {
        Endpoint::connect(&self).await
    }
}

impl<N: Network> IntoEndpoint<N> for Url {
    async fn into_endpoint(self) -> Result<Endpoint<N>, EndpointError> {
        Endpoint::connect(self.as_str()).await
    }
}
