//! The declarative list of deployed contracts to verify.
use primitives::{Address, ContractRecord, RecordKey};
use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

/// Topology file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// Reading the file failed.
    #[error("failed to read topology {}: {source}", path.display())]
    Io {
        /// The topology file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not a JSON array of contract records.
    #[error("malformed topology: {0}")]
    Json(#[from] serde_json::Error),
    /// A record names no artifact.
    #[error("record at {0} has an empty source path")]
    EmptySourcePath(Address),
    /// A record was compiled with zero optimizer runs.
    #[error("record {0} has zero optimizer runs")]
    ZeroOptimizerRuns(RecordKey),
    /// Two records share the same address and source path.
    #[error("duplicate record {0}")]
    Duplicate(RecordKey),
}

/// A validated list of contract records.
///
/// Every record has a non-empty source path and a positive optimizer run
/// count, and no two records share an `(address, source path)` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Topology {
    records: Vec<ContractRecord>,
}

impl Topology {
    /// Validates `records`.
    pub fn new(records: Vec<ContractRecord>) -> Result<Self, TopologyError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if record.source_path.trim().is_empty() {
                return Err(TopologyError::EmptySourcePath(record.address));
            }
            if record.optimizer_runs == 0 {
                return Err(TopologyError::ZeroOptimizerRuns(record.key()));
            }
            if !seen.insert(record.key()) {
                return Err(TopologyError::Duplicate(record.key()));
            }
        }
        Ok(Self { records })
    }

    /// Parses a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Reads and parses the topology file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TopologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// All records in declaration order.
    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if any record is a proxy, whose implementation is read from the chain.
    pub fn has_proxies(&self) -> bool {
        self.records.iter().any(|record| record.is_proxy)
    }

    /// Splits the records into proxies and plain contracts, keeping declaration order.
    pub fn partition(&self) -> (Vec<ContractRecord>, Vec<ContractRecord>) {
        self.records
            .iter()
            .cloned()
            .partition(|record| record.is_proxy)
    }
}
