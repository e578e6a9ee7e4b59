use core::{future::Future, time::Duration};
use primitives::ContractRecord;
use std::io;

/// Verification of one record did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The verification command could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that was started.
        program: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The verification did not finish in time.
    #[error("verification timed out after {0:?}")]
    Timeout(Duration),
    /// The verification service rejected the artifact.
    #[error("verifier exited with {}: {output}", exit_status(.status))]
    Rejected {
        /// Exit status of the verification command, `None` if it was killed.
        status: Option<i32>,
        /// Last diagnostic line the verifier printed.
        output: String,
    },
    /// The verification service reported an error.
    #[error("verification service error: {0}")]
    Service(String),
}

impl VerificationError {
    /// Returns `true` if submitting the record again may succeed.
    ///
    /// A verifier that cannot be started never will be.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Spawn { .. })
    }
}

fn exit_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Submits one contract record to a source verification service.
pub trait Verifier: Send + Sync {
    /// Verifies `record`, resolving once the service has accepted or rejected it.
    fn verify(
        &self,
        record: &ContractRecord,
    ) -> impl Future<Output = Result<(), VerificationError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_spawn_failures_are_final() {
        let spawn = VerificationError::Spawn {
            program: "forge".to_string(),
            source: io::ErrorKind::NotFound.into(),
        };
        let timeout = VerificationError::Timeout(Duration::from_secs(300));
        let service = VerificationError::Service("rate limited".to_string());
        let rejected = VerificationError::Rejected {
            status: Some(1),
            output: "bytecode mismatch".to_string(),
        };
        assert!(!spawn.is_retryable());
        assert!(timeout.is_retryable());
        assert!(service.is_retryable());
        assert!(rejected.is_retryable());
    }
}
