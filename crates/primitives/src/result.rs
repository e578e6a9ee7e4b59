use crate::record::{ContractRecord, RecordKey};
use alloy_primitives::Address;
use core::fmt;

/// Terminal state of one verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VerificationStatus {
    /// The verification service accepted the artifact.
    Verified,
    /// Verification was not performed or was rejected.
    Failed,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => f.pad("verified"),
            Self::Failed => f.pad("failed"),
        }
    }
}

/// Outcome of verifying one contract record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VerificationResult {
    /// Address the verification targeted.
    pub address: Address,
    /// Artifact the verification targeted.
    pub source_path: String,
    /// Final status.
    pub status: VerificationStatus,
    /// Why the verification failed, if it did.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub reason: Option<String>,
}

impl VerificationResult {
    /// A successful result for `record`.
    pub fn verified(record: &ContractRecord) -> Self {
        Self {
            address: record.address,
            source_path: record.source_path.clone(),
            status: VerificationStatus::Verified,
            reason: None,
        }
    }

    /// A failed result for the record identified by `address` and `source_path`.
    pub fn failed(
        address: Address,
        source_path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            address,
            source_path: source_path.into(),
            status: VerificationStatus::Failed,
            reason: Some(reason.into()),
        }
    }

    /// Returns `true` if the record was verified.
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }

    /// Identity of the originating record.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            address: self.address,
            source_path: self.source_path.clone(),
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} {} {}",
            self.status, self.address, self.source_path
        )?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}
