//! ABI of the on-chain Ecotone fee calculator.
#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    /// Returns the Ecotone L1 fee of the serialized transaction `data`.
    function getL1FeeEcotone(
        bytes data,
        uint256 l1BaseFee,
        uint256 blobBaseFee,
        uint256 baseFeeScalar,
        uint256 blobBaseFeeScalar
    ) external view returns (uint256);
}
