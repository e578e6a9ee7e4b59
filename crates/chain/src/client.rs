use crate::error::ChainClientError;
use core::future::Future;
use primitives::{Address, B256};

/// Read-only capabilities of a chain node.
///
/// Every call is a round trip to the node. Implementations bound each call
/// with a timeout and surface permanent failures as [`ChainClientError`].
pub trait ChainClient: Send + Sync {
    /// Number of transactions sent from `address`.
    fn get_nonce(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<u64, ChainClientError>> + Send;

    /// Current gas price in wei.
    fn get_gas_price(&self) -> impl Future<Output = Result<u128, ChainClientError>> + Send;

    /// EIP-155 chain id.
    fn get_chain_id(&self) -> impl Future<Output = Result<u64, ChainClientError>> + Send;

    /// The 32-byte word at `slot` in the storage of `address`.
    fn get_storage_at(
        &self,
        address: Address,
        slot: B256,
    ) -> impl Future<Output = Result<B256, ChainClientError>> + Send;
}
