//! Access to a remote chain node.
//!
//! [`ChainClient`] is the capability set the fee estimator and the verification
//! orchestrator need from a node. [`RpcChainClient`] implements it over JSON-RPC
//! with per-request timeouts and bounded retries, [`InMemoryChain`] implements
//! it over maps for tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod client;
pub mod error;
pub mod in_memory;
pub mod l1block;
pub mod oracle;
pub mod retry;
pub mod rpc;

pub use client::ChainClient;
pub use error::ChainClientError;
pub use in_memory::{InMemoryChain, StorageFailure};
pub use l1block::fetch_fee_parameters;
pub use retry::{with_retry, RetryPolicy};
pub use rpc::RpcChainClient;
