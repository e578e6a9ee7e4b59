use crate::{client::ChainClient, error::ChainClientError};
use core::time::Duration;
use primitives::{Address, B256};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Failure returned by [`InMemoryChain::get_storage_at`] for a given address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageFailure {
    /// A retryable failure, [`ChainClientError::Unavailable`].
    Transient,
    /// A permanent failure, [`ChainClientError::Rejected`].
    Permanent,
}

/// A [`ChainClient`] serving state from memory.
///
/// Unset storage reads as zero and unknown accounts have nonce zero, as on a
/// real node. Reads of an address can be delayed or made to fail.
#[derive(Debug, Default)]
pub struct InMemoryChain {
    chain_id: u64,
    gas_price: u128,
    nonces: HashMap<Address, u64>,
    storage: HashMap<(Address, B256), B256>,
    latency: HashMap<Address, Duration>,
    failures: HashMap<Address, StorageFailure>,
    storage_reads: AtomicUsize,
}

impl InMemoryChain {
    /// Creates an empty chain with the given chain id.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    /// Sets the gas price.
    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// Sets the nonce of `address`.
    pub fn with_nonce(mut self, address: Address, nonce: u64) -> Self {
        self.nonces.insert(address, nonce);
        self
    }

    /// Writes `value` to `slot` of `address`.
    pub fn with_storage(mut self, address: Address, slot: B256, value: B256) -> Self {
        self.storage.insert((address, slot), value);
        self
    }

    /// Delays every storage read of `address` by `latency`.
    pub fn with_latency(mut self, address: Address, latency: Duration) -> Self {
        self.latency.insert(address, latency);
        self
    }

    /// Makes every storage read of `address` fail.
    pub fn with_storage_failure(mut self, address: Address, failure: StorageFailure) -> Self {
        self.failures.insert(address, failure);
        self
    }

    /// Number of storage reads served so far, failed ones included.
    pub fn storage_reads(&self) -> usize {
        self.storage_reads.load(Ordering::SeqCst)
    }
}

impl ChainClient for InMemoryChain {
    async fn get_nonce(&self, address: Address) -> Result<u64, ChainClientError> {
        Ok(self.nonces.get(&address).copied().unwrap_or_default())
    }

    async fn get_gas_price(&self) -> Result<u128, ChainClientError> {
        Ok(self.gas_price)
    }

    async fn get_chain_id(&self) -> Result<u64, ChainClientError> {
        Ok(self.chain_id)
    }

    async fn get_storage_at(&self, address: Address, slot: B256) -> Result<B256, ChainClientError> {
        self.storage_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency.get(&address) {
            tokio::time::sleep(*latency).await;
        }
        match self.failures.get(&address) {
            Some(StorageFailure::Transient) => Err(ChainClientError::Unavailable(format!(
                "storage of {address} is unavailable"
            ))),
            Some(StorageFailure::Permanent) => Err(ChainClientError::Rejected(format!(
                "storage of {address} cannot be read"
            ))),
            None => {
                let value = self.storage.get(&(address, slot)).copied();
                Ok(value.unwrap_or_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::address;

    const ACCOUNT: Address = address!("0x13aa3dfF556D04F4c4530b6F05E88b9a900145C4");

    #[tokio::test]
    async fn serves_configured_state() {
        let set = B256::with_last_byte(1);
        let unset = B256::with_last_byte(2);
        let chain = InMemoryChain::new(10)
            .with_gas_price(1_000_000_000)
            .with_nonce(ACCOUNT, 7)
            .with_storage(ACCOUNT, set, B256::with_last_byte(42));

        assert_eq!(chain.get_chain_id().await.unwrap(), 10);
        assert_eq!(chain.get_gas_price().await.unwrap(), 1_000_000_000);
        assert_eq!(chain.get_nonce(ACCOUNT).await.unwrap(), 7);
        assert_eq!(chain.get_nonce(Address::ZERO).await.unwrap(), 0);
        assert_eq!(
            chain.get_storage_at(ACCOUNT, set).await.unwrap(),
            B256::with_last_byte(42)
        );
        assert_eq!(
            chain.get_storage_at(ACCOUNT, unset).await.unwrap(),
            B256::ZERO
        );
        assert_eq!(chain.storage_reads(), 2);
    }

    #[tokio::test]
    async fn injected_failures() {
        let chain = InMemoryChain::new(10)
            .with_storage_failure(ACCOUNT, StorageFailure::Permanent)
            .with_storage_failure(Address::ZERO, StorageFailure::Transient);

        let err = chain.get_storage_at(ACCOUNT, B256::ZERO).await.unwrap_err();
        assert!(!err.is_transient());
        let err = chain
            .get_storage_at(Address::ZERO, B256::ZERO)
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }
}
