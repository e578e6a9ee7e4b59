use core::fmt;
use primitives::VerificationResult;
use serde::Serialize;

/// Results of one orchestration run, one per dispatched or unresolved record.
///
/// Results are kept sorted by `(address, source path)` so the report does not
/// depend on the order in which verifications completed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    results: Vec<VerificationResult>,
}

impl VerificationReport {
    /// Builds a report from results in any order.
    pub fn new(results: impl IntoIterator<Item = VerificationResult>) -> Self {
        let mut report = Self::default();
        report.extend(results);
        report
    }

    /// Adds results.
    pub fn extend(&mut self, results: impl IntoIterator<Item = VerificationResult>) {
        self.results.extend(results);
        self.results
            .sort_by(|a, b| (a.address, &a.source_path).cmp(&(b.address, &b.source_path)));
    }

    /// All results.
    pub fn results(&self) -> &[VerificationResult] {
        &self.results
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if the report holds no result.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of verified records.
    pub fn verified_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.is_verified())
            .count()
    }

    /// Number of failed records.
    pub fn failed_count(&self) -> usize {
        self.len() - self.verified_count()
    }

    /// Failed results.
    pub fn failures(&self) -> impl Iterator<Item = &VerificationResult> {
        self.results.iter().filter(|result| !result.is_verified())
    }

    /// Returns `true` if every record was verified.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(VerificationResult::is_verified)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{result}")?;
        }
        write!(
            f,
            "{} verified, {} failed",
            self.verified_count(),
            self.failed_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{address, ContractRecord};

    fn sample() -> VerificationReport {
        VerificationReport::new([
            VerificationResult::failed(
                address!("0x4200000000000000000000000000000000000015"),
                "src/L2/L1Block.sol:L1Block",
                "unresolved implementation",
            ),
            VerificationResult::verified(&ContractRecord::new(
                "src/vendor/WETH9.sol:WETH9",
                address!("0x4200000000000000000000000000000000000006"),
                200,
            )),
        ])
    }

    #[test]
    fn sorted_by_address() {
        let report = sample();
        assert_eq!(
            report.results()[0].address,
            address!("0x4200000000000000000000000000000000000006")
        );
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn counts() {
        let report = sample();
        assert_eq!(report.verified_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 1);
        assert!(VerificationReport::default().is_success());
    }

    #[test]
    fn display() {
        let expected = "\
verified 0x4200000000000000000000000000000000000006 src/vendor/WETH9.sol:WETH9
failed   0x4200000000000000000000000000000000000015 src/L2/L1Block.sol:L1Block (unresolved implementation)
1 verified, 1 failed";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn serializes_results() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["results"][0]["status"], "verified");
        assert_eq!(json["results"][1]["reason"], "unresolved implementation");
        assert!(json["results"][0].get("reason").is_none());
    }
}
