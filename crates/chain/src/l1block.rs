use crate::{client::ChainClient, error::ChainClientError};
use fee::FeeParameters;
use primitives::{
    B256, BASE_FEE_SCALAR_OFFSET, BLOB_BASE_FEE_SCALAR_OFFSET, ECOTONE_L1_BLOB_BASE_FEE_SLOT,
    ECOTONE_L1_FEE_SCALARS_SLOT, L1_BASE_FEE_SLOT, L1_BLOCK_CONTRACT, U256,
};
use tracing::debug;

/// Fetches the current Ecotone fee parameters from the L1Block predeploy.
///
/// The base fee and blob base fee occupy their own slots. Both 4-byte scalars
/// are packed into one slot next to the sequence number, at
/// [BASE_FEE_SCALAR_OFFSET] and [BLOB_BASE_FEE_SCALAR_OFFSET].
pub async fn fetch_fee_parameters<C: ChainClient>(
    client: &C,
) -> Result<FeeParameters, ChainClientError> {
    let (l1_base_fee, blob_base_fee, scalars) = tokio::try_join!(
        client.get_storage_at(L1_BLOCK_CONTRACT, L1_BASE_FEE_SLOT),
        client.get_storage_at(L1_BLOCK_CONTRACT, ECOTONE_L1_BLOB_BASE_FEE_SLOT),
        client.get_storage_at(L1_BLOCK_CONTRACT, ECOTONE_L1_FEE_SCALARS_SLOT),
    )?;

    let params = FeeParameters::new(
        word(l1_base_fee),
        word(blob_base_fee),
        packed_scalar(&scalars, BASE_FEE_SCALAR_OFFSET),
        packed_scalar(&scalars, BLOB_BASE_FEE_SCALAR_OFFSET),
    );
    debug!(%params, "fetched l1 fee parameters");
    Ok(params)
}

fn word(value: B256) -> U256 {
    U256::from_be_bytes(value.0)
}

fn packed_scalar(slot: &B256, offset: usize) -> U256 {
    U256::from_be_slice(&slot[offset..offset + 4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::{InMemoryChain, StorageFailure};

    fn scalars_slot(base_fee_scalar: u32, blob_base_fee_scalar: u32) -> B256 {
        let mut slot = [0u8; 32];
        // Sequence number sits in the low bytes and must be ignored.
        slot[24..].copy_from_slice(&42u64.to_be_bytes());
        slot[BASE_FEE_SCALAR_OFFSET..BASE_FEE_SCALAR_OFFSET + 4]
            .copy_from_slice(&base_fee_scalar.to_be_bytes());
        slot[BLOB_BASE_FEE_SCALAR_OFFSET..BLOB_BASE_FEE_SCALAR_OFFSET + 4]
            .copy_from_slice(&blob_base_fee_scalar.to_be_bytes());
        B256::from(slot)
    }

    #[tokio::test]
    async fn reads_ecotone_parameters() {
        let chain = InMemoryChain::new(10)
            .with_storage(
                L1_BLOCK_CONTRACT,
                L1_BASE_FEE_SLOT,
                B256::from(U256::from(30_000_000_000u64).to_be_bytes::<32>()),
            )
            .with_storage(
                L1_BLOCK_CONTRACT,
                ECOTONE_L1_BLOB_BASE_FEE_SLOT,
                B256::from(U256::from(263).to_be_bytes::<32>()),
            )
            .with_storage(
                L1_BLOCK_CONTRACT,
                ECOTONE_L1_FEE_SCALARS_SLOT,
                scalars_slot(2735, 819_492),
            );

        let params = fetch_fee_parameters(&chain).await.unwrap();
        assert_eq!(params, FeeParameters::REFERENCE);
    }

    #[tokio::test]
    async fn propagates_read_failure() {
        let chain = InMemoryChain::new(10)
            .with_storage_failure(L1_BLOCK_CONTRACT, StorageFailure::Permanent);
        assert!(matches!(
            fetch_fee_parameters(&chain).await,
            Err(ChainClientError::Rejected(_))
        ));
    }
}
