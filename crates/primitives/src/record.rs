use alloy_primitives::Address;
use core::fmt;

/// A declarative description of one verifiable on-chain artifact.
///
/// For a proxy, `source_path` names the implementation artifact. The proxy
/// itself is verified against the generic proxy artifact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ContractRecord {
    /// Forge artifact identifier, `path/to/File.sol:Contract`.
    #[cfg_attr(feature = "serde", serde(alias = "path"))]
    pub source_path: String,
    /// Deployed address.
    pub address: Address,
    /// Optimizer runs the artifact was compiled with.
    pub optimizer_runs: u32,
    /// Whether `address` is a proxy whose implementation must be resolved.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_proxy: bool,
}

impl ContractRecord {
    /// Creates a record for a contract that is not behind a proxy.
    pub fn new(source_path: impl Into<String>, address: Address, optimizer_runs: u32) -> Self {
        Self {
            source_path: source_path.into(),
            address,
            optimizer_runs,
            is_proxy: false,
        }
    }

    /// Creates a proxy record. `source_path` is the implementation artifact.
    pub fn proxy(source_path: impl Into<String>, address: Address, optimizer_runs: u32) -> Self {
        Self {
            is_proxy: true,
            ..Self::new(source_path, address, optimizer_runs)
        }
    }

    /// Identity of the record within one orchestration run.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            address: self.address,
            source_path: self.source_path.clone(),
        }
    }
}

/// The `(address, source path)` pair identifying a [`ContractRecord`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    /// Deployed address.
    pub address: Address,
    /// Forge artifact identifier.
    pub source_path: String,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.source_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn key_ignores_build_parameters() {
        let a = ContractRecord::new(
            "src/A.sol:A",
            address!("0x4200000000000000000000000000000000000006"),
            200,
        );
        let mut b = a.clone();
        b.optimizer_runs = 10_000;
        b.is_proxy = true;
        assert_eq!(a.key(), b.key());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_camel_case_and_path_alias() {
        let json = r#"[
            {"sourcePath": "src/vendor/WETH9.sol:WETH9", "address": "0x4200000000000000000000000000000000000006", "optimizerRuns": 200},
            {"path": "src/L2/L1Block.sol:L1Block", "address": "0x4200000000000000000000000000000000000015", "optimizerRuns": 200, "isProxy": true}
        ]"#;
        let records: Vec<ContractRecord> = serde_json::from_str(json).unwrap();
        assert!(!records[0].is_proxy);
        assert!(records[1].is_proxy);
        assert_eq!(records[1].source_path, "src/L2/L1Block.sol:L1Block");
    }
}
