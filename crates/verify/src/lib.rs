//! Bulk verification of deployed contracts against a source verification service.
//!
//! A [`Topology`] declares the deployed contracts. The [`Orchestrator`] resolves
//! the implementation behind every proxy, builds the full work list and drives
//! a [`Verifier`] over it concurrently. One record failing never affects the
//! others: the [`VerificationReport`] holds exactly one result per record.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod forge;
pub mod orchestrator;
pub mod report;
pub mod resolve;
pub mod topology;
pub mod verifier;

pub use forge::{ForgeConfig, ForgeVerifier};
pub use orchestrator::{DispatchRetry, Orchestrator, OrchestratorConfig, WorkList};
pub use report::VerificationReport;
pub use resolve::{implementation_address, Resolution};
pub use topology::{Topology, TopologyError};
pub use verifier::{VerificationError, Verifier};
