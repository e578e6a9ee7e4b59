use crate::{
    params::{FeeParameters, ParameterError},
    price::{PriceError, PriceSource},
};
use core::num::ParseFloatError;
use primitives::{utils::format_ether, FEE_SCALAR_DECIMAL, NON_ZERO_BYTE_COST, U256, ZERO_BYTE_COST};
use tracing::debug;

/// Fee estimation failed.
#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    /// The fee parameters were rejected.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// The spot price could not be obtained.
    #[error(transparent)]
    Price(#[from] PriceError),
    /// The native amount could not be converted for the fiat estimate.
    #[error("native fee amount is not a decimal number: {0}")]
    NativeAmount(#[from] ParseFloatError),
}

/// L1 data fee of one transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct FeeEstimate {
    /// Calldata gas of the encoded transaction, the size basis of the fee.
    pub compressed_size: u64,
    /// Fee in wei.
    pub fee_wei: U256,
    /// Fee in native units, with all 18 decimals.
    pub fee_native: String,
    /// Fee in fiat units at the spot price used.
    pub fee_fiat: f64,
    /// Spot price the fiat amount was computed with.
    pub spot_price: f64,
}

/// Estimated size of `input` after compression, in calldata gas units.
///
/// Zero bytes cost [ZERO_BYTE_COST], every other byte [NON_ZERO_BYTE_COST].
pub fn compressed_size(input: &[u8]) -> u64 {
    input.iter().fold(0, |acc, byte| {
        acc + if *byte == 0x00 {
            ZERO_BYTE_COST
        } else {
            NON_ZERO_BYTE_COST
        }
    })
}

/// Calculate the L1 data fee of an encoded transaction, in wei.
///
/// Ecotone L1 cost function:
/// `(calldataGas/16)*(l1BaseFee*16*l1BaseFeeScalar + l1BlobBaseFee*l1BlobBaseFeeScalar)/1e6`
///
/// Computed as follows for better precision under integer arithmetic:
/// `calldataGas*(l1BaseFee*16*l1BaseFeeScalar + l1BlobBaseFee*l1BlobBaseFeeScalar)/16e6`
pub fn l1_fee(input: &[u8], params: &FeeParameters) -> Result<U256, ParameterError> {
    let l1_fee_scaled = params.l1_fee_scaled()?;
    let rollup_data_gas_cost = U256::from(compressed_size(input));
    let divisor = U256::from(FEE_SCALAR_DECIMAL * NON_ZERO_BYTE_COST);

    l1_fee_scaled
        .checked_mul(rollup_data_gas_cost)
        .map(|fee| fee / divisor)
        .ok_or(ParameterError::Overflow)
}

/// Applies the Ecotone fee formula and converts the result with a [`PriceSource`].
#[derive(Clone, Debug)]
pub struct FeeEstimator<P> {
    price: P,
}

impl<P: PriceSource> FeeEstimator<P> {
    /// Creates an estimator converting to fiat with `price`.
    pub fn new(price: P) -> Self {
        Self { price }
    }

    /// Estimates the L1 data fee of the encoded transaction `tx`.
    pub fn estimate(&self, tx: &[u8], params: &FeeParameters) -> Result<FeeEstimate, FeeError> {
        let compressed_size = compressed_size(tx);
        let fee_wei = l1_fee(tx, params)?;
        let fee_native = format_ether(fee_wei);
        let spot_price = self.price.spot_price()?;
        let fee_fiat = fee_native.parse::<f64>()? * spot_price;

        debug!(compressed_size, %fee_wei, %fee_native, fee_fiat, "estimated l1 fee");

        Ok(FeeEstimate {
            compressed_size,
            fee_wei,
            fee_native,
            fee_fiat,
            spot_price,
        })
    }
}
