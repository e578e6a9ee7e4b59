use super::RpcArgs;
use chain::{ChainClient, ChainClientError, InMemoryChain};
use clap::Parser;
use primitives::{PROXY_ARTIFACT, PROXY_OPTIMIZER_RUNS};
use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};
use verify::{
    DispatchRetry, ForgeConfig, ForgeVerifier, Orchestrator, OrchestratorConfig, Topology,
    TopologyError, VerificationReport,
};

/// `verify` failed before any record was dispatched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The topology file was rejected.
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// The node could not be reached.
    #[error(transparent)]
    Chain(#[from] ChainClientError),
    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    /// The topology has proxies but no node endpoint was given.
    #[error("missing --rpc-url: proxy implementations are read from the node")]
    MissingRpcUrl,
}

/// `verify` subcommand
///
/// Resolves every proxy's implementation, then submits all records to the
/// verification service with `forge verify-contract`.
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Topology file, a JSON array of contract records
    #[arg(default_value = "topologies/op-predeploys.json")]
    topology: PathBuf,
    /// Node connection.
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// Verification service endpoint
    #[arg(long, env = "EXPLORER_URL")]
    verifier_url: String,
    /// Verification service API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: String,
    /// Forge project root holding the artifacts
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// The `forge` executable
    #[arg(long, default_value = "forge")]
    forge: PathBuf,
    /// Deadline of one verification, in seconds
    #[arg(long, default_value_t = 300)]
    verify_timeout: u64,
    /// Maximum number of verifications in flight
    #[arg(
        short = 'j',
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    concurrency: u64,
    /// Verification attempts per record, including the first one
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    attempts: u32,
    /// Delay before resubmitting a rejected record, in seconds, doubled on every attempt
    #[arg(long, default_value_t = 30)]
    retry_backoff: u64,
    /// Artifact the proxy addresses are verified against
    #[arg(long, default_value = PROXY_ARTIFACT)]
    proxy_artifact: String,
    /// Optimizer runs of the proxy artifact
    #[arg(long, default_value_t = PROXY_OPTIMIZER_RUNS)]
    proxy_optimizer_runs: u32,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Exit with a non-zero status if any record failed
    #[arg(long)]
    fail_on_error: bool,
}

impl Cmd {
    /// Runs `verify` command.
    ///
    /// The node is only contacted when the topology has proxies to resolve.
    pub async fn run(&self) -> Result<ExitCode, Error> {
        let topology = Topology::load(&self.topology)?;
        let report = if topology.has_proxies() {
            let chain = self.rpc.connect().await?.ok_or(Error::MissingRpcUrl)?;
            self.orchestrate(chain, &topology).await
        } else {
            // Plain contracts are verified at their declared address.
            self.orchestrate(InMemoryChain::default(), &topology).await
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{report}");
        }

        if self.fail_on_error && !report.is_success() {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn orchestrate<C>(&self, chain: C, topology: &Topology) -> VerificationReport
    where
        C: ChainClient + 'static,
    {
        let verifier = ForgeVerifier::new(self.forge_config());
        let orchestrator = Orchestrator::new(
            Arc::new(chain),
            Arc::new(verifier),
            self.orchestrator_config(),
        );
        orchestrator.run(topology).await
    }

    fn forge_config(&self) -> ForgeConfig {
        ForgeConfig {
            forge: self.forge.clone(),
            root: self.root.clone(),
            timeout: Duration::from_secs(self.verify_timeout),
            ..ForgeConfig::new(&self.verifier_url, &self.api_key)
        }
    }

    fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_concurrency: usize::try_from(self.concurrency).unwrap_or(usize::MAX),
            retry: DispatchRetry {
                max_attempts: self.attempts,
                backoff: Duration::from_secs(self.retry_backoff),
            },
            proxy_artifact: self.proxy_artifact.clone(),
            proxy_optimizer_runs: self.proxy_optimizer_runs,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{Cli, MainCmd};
    use primitives::IMPLEMENTATION_SLOT;
    use std::io::Write;

    const PLAIN_CONTRACT: &str = r#"[
        {
            "sourcePath": "src/vendor/WETH9.sol:WETH9",
            "address": "0x4200000000000000000000000000000000000006",
            "optimizerRuns": 10000
        }
    ]"#;

    fn parse(args: &[&str]) -> Cmd {
        let base = [
            "l2ops",
            "verify",
            "--verifier-url",
            "https://explorer.example/api",
            "--api-key",
            "key",
        ];
        let cli = Cli::try_parse_from(base.iter().chain(args)).unwrap();
        let MainCmd::Verify(mut cmd) = cli.command else {
            panic!("expected verify")
        };
        // Ignore RPC_URL from the environment.
        cmd.rpc.rpc_url = None;
        cmd
    }

    #[test]
    fn defaults() {
        let cmd = parse(&[]);
        assert_eq!(cmd.topology, PathBuf::from("topologies/op-predeploys.json"));
        assert!(!cmd.fail_on_error);

        let config = cmd.orchestrator_config();
        let expected = OrchestratorConfig {
            retry: DispatchRetry {
                max_attempts: 1,
                backoff: Duration::from_secs(30),
            },
            ..Default::default()
        };
        assert_eq!(config, expected);
        assert_eq!(config.implementation_slot, IMPLEMENTATION_SLOT);

        let forge = cmd.forge_config();
        assert_eq!(forge.verifier_url, "https://explorer.example/api");
        assert_eq!(forge.timeout, Duration::from_secs(300));
    }

    #[test]
    fn overrides() {
        let cmd = parse(&[
            "deploy/base.json",
            "-j",
            "8",
            "--attempts",
            "3",
            "--root",
            "packages/contracts-bedrock",
            "--fail-on-error",
        ]);
        assert_eq!(cmd.topology, PathBuf::from("deploy/base.json"));
        assert!(cmd.fail_on_error);
        assert_eq!(cmd.orchestrator_config().max_concurrency, 8);
        assert_eq!(cmd.orchestrator_config().retry.max_attempts, 3);
        let root = PathBuf::from("packages/contracts-bedrock");
        assert_eq!(cmd.forge_config().root, root);
    }

    #[test]
    fn rejects_zero_concurrency() {
        let args = [
            "l2ops",
            "verify",
            "--verifier-url",
            "u",
            "--api-key",
            "k",
            "-j",
            "0",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[tokio::test]
    async fn missing_topology() {
        let cmd = parse(&["does/not/exist.json"]);
        let result = cmd.run().await;
        assert!(matches!(result, Err(Error::Topology(TopologyError::Io { .. }))));
    }

    #[tokio::test]
    async fn proxies_need_rpc_url() {
        let mut cmd = parse(&[]);
        cmd.topology = PathBuf::from("../../topologies/op-predeploys.json");
        assert!(matches!(cmd.run().await, Err(Error::MissingRpcUrl)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn plain_contracts_need_no_node() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PLAIN_CONTRACT.as_bytes()).unwrap();

        let mut cmd = parse(&["--forge", "true"]);
        cmd.topology = file.path().to_path_buf();
        assert!(cmd.run().await.is_ok());
    }
}
