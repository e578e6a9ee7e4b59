pub mod estimate;
pub mod verify;

use crate::logging::LoggingArgs;
use chain::{ChainClientError, RetryPolicy, RpcChainClient};
use clap::{Args, Parser, Subcommand};
use std::{process::ExitCode, time::Duration};

/// OP Stack L2 operations.
#[derive(Parser, Debug)]
#[command(version, about, infer_subcommands = true)]
pub struct Cli {
    /// Logging flags.
    #[command(flatten)]
    pub logging: LoggingArgs,
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: MainCmd,
}

/// `l2ops` subcommands.
#[derive(Subcommand, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum MainCmd {
    /// `estimate` subcommand
    #[command(about = "Estimate the L1 data fee of a transaction")]
    Estimate(estimate::Cmd),
    /// `verify` subcommand
    #[command(about = "Verify the sources of a deployed contract topology")]
    Verify(verify::Cmd),
}

/// A subcommand failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `estimate` failed.
    #[error(transparent)]
    Estimate(#[from] estimate::Error),
    /// `verify` failed.
    #[error(transparent)]
    Verify(#[from] verify::Error),
}

impl MainCmd {
    /// Runs the subcommand and returns the process exit status.
    pub async fn run(&self) -> Result<ExitCode, Error> {
        match self {
            Self::Estimate(cmd) => {
                cmd.run().await?;
                Ok(ExitCode::SUCCESS)
            }
            Self::Verify(cmd) => cmd.run().await.map_err(Into::into),
        }
    }
}

/// Node connection flags.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RpcArgs {
    /// JSON-RPC endpoint of the L2 node
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,
    /// Attempts per RPC request, including the first one
    #[arg(
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub rpc_attempts: u32,
    /// Deadline of one RPC attempt, in seconds
    #[arg(long, default_value_t = 10)]
    pub rpc_timeout: u64,
}

impl RpcArgs {
    /// Retry policy of every RPC request.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.rpc_attempts,
            timeout: Duration::from_secs(self.rpc_timeout),
            ..Default::default()
        }
    }

    /// Connects to the node if an endpoint was given.
    pub async fn connect(&self) -> Result<Option<RpcChainClient>, ChainClientError> {
        match &self.rpc_url {
            Some(url) => RpcChainClient::connect(url, self.policy()).await.map(Some),
            None => Ok(None),
        }
    }
}
