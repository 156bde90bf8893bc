//! ENS reverse resolution routed through the pool.
//!
//! Resolution is the standard two-step reverse lookup: ask the registry for
//! the resolver of `<address>.addr.reverse`, then ask that resolver for the
//! `name` record. Both are plain `eth_call`s and inherit the pool's failover
//! semantics. Mainnet layout only.

use alloy::{
    hex,
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, B256, address, keccak256},
    providers::Provider,
    rpc::types::TransactionRequest,
    sol,
    sol_types::SolCall,
    transports::TransportErrorKind,
};
use tracing::trace;

use crate::{error::Error, provider::MultiRpcProvider};

const ENS_REGISTRY: Address = address!("0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

sol! {
    function resolver(bytes32 node) external view returns (address);
    function name(bytes32 node) external view returns (string);
}

impl MultiRpcProvider<Ethereum> {
    /// Looks up the primary ENS name for `address`, with failover.
    ///
    /// Returns `None` when the address has no reverse resolver or an empty
    /// name record. Forward-verification of the returned name is left to the
    /// caller.
    ///
    /// # Errors
    ///
    /// [`Error::AllProvidersFailed`] if every endpoint fails.
    pub async fn get_ens_name(&self, address: Address) -> Result<Option<String>, Error> {
        trace!(%address, "resolving ENS name");
        let node = reverse_node(address);

        let resolver = self
            .safe_call(move |endpoint| async move {
                let request = TransactionRequest::default()
                    .with_to(ENS_REGISTRY)
                    .with_input(resolverCall { node }.abi_encode());
                let output = endpoint.provider().call(request).await?;
                resolverCall::abi_decode_returns(&output).map_err(TransportErrorKind::custom)
            })
            .await?;

        if resolver.is_zero() {
            return Ok(None);
        }

        let name = self
            .safe_call(move |endpoint| async move {
                let request = TransactionRequest::default()
                    .with_to(resolver)
                    .with_input(nameCall { node }.abi_encode());
                let output = endpoint.provider().call(request).await?;
                nameCall::abi_decode_returns(&output).map_err(TransportErrorKind::custom)
            })
            .await?;

        Ok((!name.is_empty()).then_some(name))
    }
}

/// Namehash of `<address-hex>.addr.reverse`, the node the reverse registrar
/// assigns to `address`.
fn reverse_node(address: Address) -> B256 {
    namehash(&format!("{}.addr.reverse", hex::encode(address)))
}

/// EIP-137 recursive name hash.
fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(keccak256(label.as_bytes()).as_slice());
        node = keccak256(buf);
    }
    node
}
