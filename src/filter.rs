use alloy::{primitives::Address, rpc::types::Filter};

/// Describes which event logs to fetch or watch.
///
/// An `EventFilter` pairs a marketplace contract address with a Solidity event
/// signature (e.g. `"Transfer(address,address,uint256)"`). Either part may be
/// omitted to widen the match. Block bounds are applied separately, per chunk,
/// by the indexer.
///
/// # Example
///
/// ```rust
/// use alloy::primitives::address;
/// use multi_rpc::EventFilter;
///
/// let filter = EventFilter::new()
///     .contract_address(address!("0xd8dA6BF26964af9d7eed9e03e53415d37aa96045"))
///     .event("OrderFulfilled(bytes32,address,address)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    address: Option<Address>,
    event: Option<String>,
}

impl EventFilter {
    /// Creates an empty filter matching all logs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to logs emitted by `address`.
    #[must_use]
    pub fn contract_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Restricts the filter to logs matching the event `signature`.
    #[must_use]
    pub fn event(mut self, signature: impl Into<String>) -> Self {
        self.event = Some(signature.into());
        self
    }
}

impl From<&EventFilter> for Filter {
    fn from(filter: &EventFilter) -> Filter {
        let mut out = Filter::new();
        if let Some(address) = filter.address {
            out = out.address(address);
        }
        if let Some(event) = &filter.event {
            out = out.event(event);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const SIGNATURE: &str = "CountIncreased(uint256)";

    #[test]
    fn converts_address_and_event_into_alloy_filter() {
        let address = address!("0xd8dA6BF26964af9d7eed9e03e53415d37aa96045");
        let filter = EventFilter::new().contract_address(address).event(SIGNATURE);

        let expected = Filter::new().address(address).event(SIGNATURE);
        assert_eq!(Filter::from(&filter), expected);
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(Filter::from(&EventFilter::new()), Filter::new());
    }

    #[test]
    fn address_only_filter_leaves_topics_unset() {
        let address = address!("0xd8dA6BF26964af9d7eed9e03e53415d37aa96045");
        let filter = EventFilter::new().contract_address(address);

        assert_eq!(Filter::from(&filter), Filter::new().address(address));
    }
}
