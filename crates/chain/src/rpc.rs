use crate::{
    client::ChainClient,
    error::ChainClientError,
    oracle::getL1FeeEcotoneCall,
    retry::{with_retry, RetryPolicy},
};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_sol_types::SolCall;
use core::fmt;
use fee::FeeParameters;
use primitives::{Address, Bytes, B256, U256};
use tracing::debug;

/// A [`ChainClient`] talking JSON-RPC to a node over HTTP(S).
///
/// Every request runs under the client's [`RetryPolicy`].
#[derive(Clone)]
pub struct RpcChainClient {
    provider: DynProvider,
    policy: RetryPolicy,
}

impl fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RpcChainClient {
    /// Creates a client over an existing provider.
    pub fn new(provider: DynProvider, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Connects to the node at `rpc_url`.
    pub async fn connect(rpc_url: &str, policy: RetryPolicy) -> Result<Self, ChainClientError> {
        let provider = ProviderBuilder::new().connect(rpc_url).await?.erased();
        Ok(Self::new(provider, policy))
    }

    /// The retry policy applied to every request.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Computes the L1 fee of `tx` with the on-chain calculator deployed at `oracle`.
    ///
    /// Used to cross-check the local fee formula against the canonical
    /// on-chain computation.
    pub async fn oracle_l1_fee(
        &self,
        oracle: Address,
        tx: &Bytes,
        params: &FeeParameters,
    ) -> Result<U256, ChainClientError> {
        let input = getL1FeeEcotoneCall {
            data: tx.clone(),
            l1BaseFee: params.l1_base_fee,
            blobBaseFee: params.blob_base_fee,
            baseFeeScalar: params.base_fee_scalar,
            blobBaseFeeScalar: params.blob_base_fee_scalar,
        }
        .abi_encode();
        let request = TransactionRequest::default()
            .to(oracle)
            .input(Bytes::from(input).into());

        let output = with_retry(&self.policy, "eth_call", || {
            let request = request.clone();
            async move {
                self.provider
                    .call(request)
                    .await
                    .map_err(ChainClientError::from)
            }
        })
        .await?;

        let fee = getL1FeeEcotoneCall::abi_decode_returns(&output).map_err(|source| {
            ChainClientError::Decode {
                what: "getL1FeeEcotone return value",
                source,
            }
        })?;
        debug!(%oracle, %fee, "oracle l1 fee");
        Ok(fee)
    }
}

impl ChainClient for RpcChainClient {
    async fn get_nonce(&self, address: Address) -> Result<u64, ChainClientError> {
        with_retry(&self.policy, "eth_getTransactionCount", || async {
            self.provider
                .get_transaction_count(address)
                .await
                .map_err(ChainClientError::from)
        })
        .await
    }

    async fn get_gas_price(&self) -> Result<u128, ChainClientError> {
        with_retry(&self.policy, "eth_gasPrice", || async {
            self.provider
                .get_gas_price()
                .await
                .map_err(ChainClientError::from)
        })
        .await
    }

    async fn get_chain_id(&self) -> Result<u64, ChainClientError> {
        with_retry(&self.policy, "eth_chainId", || async {
            self.provider
                .get_chain_id()
                .await
                .map_err(ChainClientError::from)
        })
        .await
    }

    async fn get_storage_at(&self, address: Address, slot: B256) -> Result<B256, ChainClientError> {
        let key = U256::from_be_bytes(slot.0);
        let value = with_retry(&self.policy, "eth_getStorageAt", || async {
            self.provider
                .get_storage_at(address, key)
                .await
                .map_err(ChainClientError::from)
        })
        .await?;
        debug!(%address, %slot, %value, "storage read");
        Ok(B256::from(value.to_be_bytes::<32>()))
    }
}
