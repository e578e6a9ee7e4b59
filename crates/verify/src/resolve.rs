//! Proxy implementation lookup.
use primitives::{Address, ContractRecord, B256};

/// Decodes an implementation address from a raw storage slot value.
///
/// The address occupies the low 20 bytes. A value with non-zero high bytes is
/// not an address, and the zero address means the slot was never written.
pub fn implementation_address(value: B256) -> Option<Address> {
    let (padding, address) = value.split_at(12);
    if padding.iter().any(|byte| *byte != 0) {
        return None;
    }
    let address = Address::from_slice(address);
    (!address.is_zero()).then_some(address)
}

/// Implementation lookup outcome for one proxy record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The proxy record.
    pub proxy: ContractRecord,
    /// The implementation address, or why it could not be found.
    pub implementation: Result<Address, String>,
}

impl Resolution {
    /// The implementation record to verify, if the lookup succeeded.
    ///
    /// It carries the proxy's artifact and optimizer runs.
    pub fn implementation_record(&self) -> Option<ContractRecord> {
        let address = *self.implementation.as_ref().ok()?;
        Some(ContractRecord::new(
            self.proxy.source_path.clone(),
            address,
            self.proxy.optimizer_runs,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{address, b256};

    #[test]
    fn decodes_padded_address() {
        let value = b256!("0x000000000000000000000000c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d30015");
        assert_eq!(
            implementation_address(value),
            Some(address!("0xc0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d30015"))
        );
    }

    #[test]
    fn keeps_leading_zero_bytes() {
        let value = b256!("0x0000000000000000000000000000c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d30015");
        assert_eq!(
            implementation_address(value),
            Some(address!("0x0000c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d30015"))
        );
    }

    #[test]
    fn unset_slot() {
        assert_eq!(implementation_address(B256::ZERO), None);
    }

    #[test]
    fn rejects_dirty_padding() {
        let value = b256!("0x010000000000000000000000c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d30015");
        assert_eq!(implementation_address(value), None);
    }

    #[test]
    fn implementation_record_inherits_build_parameters() {
        let proxy = ContractRecord::proxy(
            "src/L2/BaseFeeVault.sol:BaseFeeVault",
            address!("0x4200000000000000000000000000000000000019"),
            10_000,
        );
        let implementation = address!("0xc0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d30019");
        let resolution = Resolution {
            proxy: proxy.clone(),
            implementation: Ok(implementation),
        };
        let expected = ContractRecord::new(proxy.source_path.clone(), implementation, 10_000);
        assert_eq!(resolution.implementation_record(), Some(expected));

        let unresolved = Resolution {
            proxy,
            implementation: Err("unresolved implementation".into()),
        };
        assert_eq!(unresolved.implementation_record(), None);
    }
}
