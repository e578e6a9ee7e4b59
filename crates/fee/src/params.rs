use core::fmt;
use primitives::{NON_ZERO_BYTE_COST, U256};

/// An Ecotone fee parameter was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    /// The parameter was negative.
    #[error("fee parameter `{field}` must not be negative")]
    Negative {
        /// Name of the parameter.
        field: &'static str,
    },
    /// The parameter is not an unsigned integer.
    #[error("fee parameter `{field}` is not an unsigned integer: {input:?}")]
    Invalid {
        /// Name of the parameter.
        field: &'static str,
        /// The rejected input.
        input: String,
    },
    /// The fee does not fit in 256 bits.
    #[error("l1 fee overflows 256 bits")]
    Overflow,
}

/// Inputs of the Ecotone L1 cost function.
///
/// Scalars are fixed point numbers with six decimal digits, as stored in the
/// L1Block predeploy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeParameters {
    /// Base fee of the L1 origin block, in wei.
    pub l1_base_fee: U256,
    /// Blob base fee of the L1 origin block, in wei.
    pub blob_base_fee: U256,
    /// Scalar applied to the calldata cost component.
    pub base_fee_scalar: U256,
    /// Scalar applied to the blob cost component.
    pub blob_base_fee_scalar: U256,
}

impl FeeParameters {
    /// Indicative parameters: a 30 gwei L1 base fee with the default chain scalars.
    pub const REFERENCE: Self = Self {
        l1_base_fee: U256::from_limbs([30_000_000_000, 0, 0, 0]),
        blob_base_fee: U256::from_limbs([263, 0, 0, 0]),
        base_fee_scalar: U256::from_limbs([2735, 0, 0, 0]),
        blob_base_fee_scalar: U256::from_limbs([819_492, 0, 0, 0]),
    };

    /// Creates fee parameters from unsigned values.
    pub fn new(
        l1_base_fee: U256,
        blob_base_fee: U256,
        base_fee_scalar: U256,
        blob_base_fee_scalar: U256,
    ) -> Self {
        Self {
            l1_base_fee,
            blob_base_fee,
            base_fee_scalar,
            blob_base_fee_scalar,
        }
    }

    /// Creates fee parameters from signed values, rejecting negatives.
    pub fn from_signed(
        l1_base_fee: i128,
        blob_base_fee: i128,
        base_fee_scalar: i128,
        blob_base_fee_scalar: i128,
    ) -> Result<Self, ParameterError> {
        let unsigned = |field, value: i128| {
            u128::try_from(value)
                .map(U256::from)
                .map_err(|_| ParameterError::Negative { field })
        };
        Ok(Self {
            l1_base_fee: unsigned("l1_base_fee", l1_base_fee)?,
            blob_base_fee: unsigned("blob_base_fee", blob_base_fee)?,
            base_fee_scalar: unsigned("base_fee_scalar", base_fee_scalar)?,
            blob_base_fee_scalar: unsigned("blob_base_fee_scalar", blob_base_fee_scalar)?,
        })
    }

    /// Parses fee parameters from decimal or `0x`-prefixed hex strings.
    pub fn parse(
        l1_base_fee: &str,
        blob_base_fee: &str,
        base_fee_scalar: &str,
        blob_base_fee_scalar: &str,
    ) -> Result<Self, ParameterError> {
        Ok(Self {
            l1_base_fee: parse_field("l1_base_fee", l1_base_fee)?,
            blob_base_fee: parse_field("blob_base_fee", blob_base_fee)?,
            base_fee_scalar: parse_field("base_fee_scalar", base_fee_scalar)?,
            blob_base_fee_scalar: parse_field("blob_base_fee_scalar", blob_base_fee_scalar)?,
        })
    }

    /// `l1BaseFee*16*l1BaseFeeScalar + l1BlobBaseFee*l1BlobBaseFeeScalar`
    pub fn l1_fee_scaled(&self) -> Result<U256, ParameterError> {
        let calldata_cost_per_byte = self
            .l1_base_fee
            .checked_mul(U256::from(NON_ZERO_BYTE_COST))
            .and_then(|fee| fee.checked_mul(self.base_fee_scalar));
        let blob_cost_per_byte = self.blob_base_fee.checked_mul(self.blob_base_fee_scalar);

        calldata_cost_per_byte
            .zip(blob_cost_per_byte)
            .and_then(|(calldata, blob)| calldata.checked_add(blob))
            .ok_or(ParameterError::Overflow)
    }
}

impl fmt::Display for FeeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "l1BaseFee={} blobBaseFee={} baseFeeScalar={} blobBaseFeeScalar={}",
            self.l1_base_fee, self.blob_base_fee, self.base_fee_scalar, self.blob_base_fee_scalar
        )
    }
}

/// Parses one non-negative fee parameter.
pub fn parse_field(field: &'static str, input: &str) -> Result<U256, ParameterError> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(ParameterError::Negative { field });
    }
    input.parse::<U256>().map_err(|_| ParameterError::Invalid {
        field,
        input: input.to_string(),
    })
}
