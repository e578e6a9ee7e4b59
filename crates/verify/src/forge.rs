use crate::verifier::{VerificationError, Verifier};
use core::{fmt, time::Duration};
use primitives::ContractRecord;
use std::{path::PathBuf, process::Stdio};
use tokio::process::Command;
use tracing::debug;

/// Settings of the `forge verify-contract` invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct ForgeConfig {
    /// The `forge` executable.
    pub forge: PathBuf,
    /// Verification service endpoint, passed as `--verifier-url`.
    pub verifier_url: String,
    /// Verification service API key, passed as `--etherscan-api-key`.
    pub api_key: String,
    /// Project root containing the artifacts.
    pub root: PathBuf,
    /// Deadline of one verification.
    pub timeout: Duration,
}

impl ForgeConfig {
    /// Creates a config using `forge` from `PATH` with the current directory as root.
    pub fn new(verifier_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            forge: PathBuf::from("forge"),
            verifier_url: verifier_url.into(),
            api_key: api_key.into(),
            root: PathBuf::from("."),
            timeout: Duration::from_secs(300),
        }
    }
}

impl fmt::Debug for ForgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgeConfig")
            .field("forge", &self.forge)
            .field("verifier_url", &self.verifier_url)
            .field("api_key", &"<redacted>")
            .field("root", &self.root)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A [`Verifier`] that runs `forge verify-contract` for every record.
///
/// Exit status zero means the service accepted the artifact.
#[derive(Clone, Debug)]
pub struct ForgeVerifier {
    config: ForgeConfig,
}

impl ForgeVerifier {
    /// Creates a verifier with `config`.
    pub fn new(config: ForgeConfig) -> Self {
        Self { config }
    }

    /// The command verifying `record`.
    pub fn command(&self, record: &ContractRecord) -> Command {
        let mut command = Command::new(&self.config.forge);
        command
            .arg("verify-contract")
            .arg("--verifier-url")
            .arg(&self.config.verifier_url)
            .arg(record.address.to_string())
            .arg(&record.source_path)
            .arg("--root")
            .arg(&self.config.root)
            .arg("--optimizer-runs")
            .arg(record.optimizer_runs.to_string())
            .arg("--etherscan-api-key")
            .arg(&self.config.api_key)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

impl Verifier for ForgeVerifier {
    async fn verify(&self, record: &ContractRecord) -> Result<(), VerificationError> {
        let mut command = self.command(record);
        debug!(
            address = %record.address,
            source = %record.source_path,
            "running forge verify-contract"
        );

        let output = tokio::time::timeout(self.config.timeout, command.output())
            .await
            .map_err(|_| VerificationError::Timeout(self.config.timeout))?
            .map_err(|source| VerificationError::Spawn {
                program: self.config.forge.display().to_string(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }
        Err(VerificationError::Rejected {
            status: output.status.code(),
            output: last_line(&output.stderr)
                .or_else(|| last_line(&output.stdout))
                .unwrap_or_default(),
        })
    }
}

/// Last non-empty line of a command's output.
fn last_line(output: &[u8]) -> Option<String> {
    String::from_utf8_lossy(output)
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(str::to_string)
}
