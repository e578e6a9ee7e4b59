//! Canonical byte encoding of transactions submitted for L1 data fee estimation.
//!
//! The encoding is the unsigned legacy RLP form used when signing an EIP-155
//! transaction: `[nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0]`.
//! A zero chain id drops the last three fields.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod draft;
pub mod error;
pub mod transaction;

pub use draft::TxDraft;
pub use error::EncodingError;
pub use transaction::{encode, encode_draft, TransactionRequest};
