//! L1 data fee estimation for OP Stack transactions under the Ecotone cost function.
//!
//! The fee is computed with exact integer arithmetic from the encoded transaction
//! and the four [`FeeParameters`]. Only the final fiat conversion uses floating point,
//! with the spot price supplied by a [`PriceSource`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod estimator;
pub mod params;
pub mod price;

pub use estimator::{compressed_size, l1_fee, FeeError, FeeEstimate, FeeEstimator};
pub use params::{FeeParameters, ParameterError};
pub use price::{FilePrice, FixedPrice, PriceError, PriceSource, REFERENCE_ETH_PRICE};
