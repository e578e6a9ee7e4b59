//! Shared types for l2ops: contract records, verification outcomes and
//! the OP Stack constants used by fee estimation and proxy resolution.
//!
//! Re-exports the [`alloy_primitives`] types every other crate in the
//! workspace builds on.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod constants;
pub mod record;
pub mod result;

pub use alloy_primitives::{
    self, address, b256, bytes, hex, utils, Address, Bytes, TxKind, B256, U256,
};
pub use constants::*;
pub use record::{ContractRecord, RecordKey};
pub use result::{VerificationResult, VerificationStatus};
