//! Concurrent verification of a whole topology.
//!
//! A run has two phases separated by a barrier:
//!
//! 1. every proxy's implementation slot is read concurrently, and
//! 2. once all lookups have finished, the full work list is dispatched to the
//!    [`Verifier`] with bounded concurrency.
//!
//! Each record produces exactly one [`VerificationResult`]. A failed lookup or
//! verification is recorded for that record only.
use crate::{
    report::VerificationReport,
    resolve::{implementation_address, Resolution},
    topology::Topology,
    verifier::Verifier,
};
use chain::ChainClient;
use core::time::Duration;
use primitives::{
    ContractRecord, RecordKey, VerificationResult, B256, IMPLEMENTATION_SLOT, PROXY_ARTIFACT,
    PROXY_OPTIMIZER_RUNS, UNRESOLVED_IMPLEMENTATION,
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info, instrument, warn};

/// Resubmission of records the verifier rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchRetry {
    /// Verification attempts per record, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled for every further one.
    pub backoff: Duration,
}

impl DispatchRetry {
    /// Upper bound of the delay between two attempts.
    pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

    /// One attempt per record.
    pub const NONE: Self = Self {
        max_attempts: 1,
        backoff: Duration::ZERO,
    };

    /// Delay after the failed attempt number `attempt`, starting at 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor).min(Self::MAX_BACKOFF)
    }
}

impl Default for DispatchRetry {
    fn default() -> Self {
        Self::NONE
    }
}

/// Orchestration settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Maximum number of verifications in flight.
    pub max_concurrency: usize,
    /// Resubmission of rejected records.
    pub retry: DispatchRetry,
    /// Storage slot holding a proxy's implementation address.
    pub implementation_slot: B256,
    /// Artifact every proxy address is verified against.
    pub proxy_artifact: String,
    /// Optimizer runs of the proxy artifact.
    pub proxy_optimizer_runs: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            retry: DispatchRetry::default(),
            implementation_slot: IMPLEMENTATION_SLOT,
            proxy_artifact: PROXY_ARTIFACT.to_string(),
            proxy_optimizer_runs: PROXY_OPTIMIZER_RUNS,
        }
    }
}

/// Records to dispatch and the results already known before dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkList {
    /// Records to submit, each `(address, source path)` at most once.
    pub dispatch: Vec<ContractRecord>,
    /// Failed results of proxies whose implementation was not found.
    pub unresolved: Vec<VerificationResult>,
}

impl WorkList {
    fn push(&mut self, seen: &mut HashSet<RecordKey>, record: ContractRecord) {
        if seen.insert(record.key()) {
            self.dispatch.push(record);
        } else {
            debug!(key = %record.key(), "skipping duplicate record");
        }
    }
}

/// Drives verification of a [`Topology`].
#[derive(Debug)]
pub struct Orchestrator<C, V> {
    chain: Arc<C>,
    verifier: Arc<V>,
    config: OrchestratorConfig,
}

impl<C, V> Orchestrator<C, V>
where
    C: ChainClient + 'static,
    V: Verifier + 'static,
{
    /// Creates an orchestrator.
    pub fn new(chain: Arc<C>, verifier: Arc<V>, config: OrchestratorConfig) -> Self {
        Self {
            chain,
            verifier,
            config,
        }
    }

    /// Orchestration settings.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Verifies every record of `topology`.
    ///
    /// Never fails as a whole: lookup and verification failures become failed
    /// results of the records they concern.
    #[instrument(skip_all, fields(records = topology.len()))]
    pub async fn run(&self, topology: &Topology) -> VerificationReport {
        let work = self.plan(topology).await;
        info!(
            dispatch = work.dispatch.len(),
            unresolved = work.unresolved.len(),
            "dispatching verifications"
        );

        let mut report = VerificationReport::new(work.unresolved);
        report.extend(self.dispatch(work.dispatch).await);
        info!(
            verified = report.verified_count(),
            failed = report.failed_count(),
            "verification finished"
        );
        report
    }

    /// Resolves every proxy and builds the work list.
    ///
    /// Order: proxy records, then implementations, then plain contracts, all in
    /// declaration order.
    pub async fn plan(&self, topology: &Topology) -> WorkList {
        let (proxies, contracts) = topology.partition();
        let resolutions = self.resolve(proxies).await;

        let mut work = WorkList::default();
        let mut seen = HashSet::new();
        for resolution in &resolutions {
            let proxy = ContractRecord::new(
                self.config.proxy_artifact.clone(),
                resolution.proxy.address,
                self.config.proxy_optimizer_runs,
            );
            work.push(&mut seen, proxy);
        }
        for resolution in resolutions {
            match resolution.implementation_record() {
                Some(record) => work.push(&mut seen, record),
                None => {
                    let reason = resolution
                        .implementation
                        .err()
                        .unwrap_or_else(|| UNRESOLVED_IMPLEMENTATION.to_string());
                    work.unresolved.push(VerificationResult::failed(
                        resolution.proxy.address,
                        resolution.proxy.source_path,
                        reason,
                    ));
                }
            }
        }
        for contract in contracts {
            work.push(&mut seen, contract);
        }
        work
    }

    /// Reads the implementation slot of every proxy concurrently.
    ///
    /// Returns once every lookup has finished, in declaration order.
    #[instrument(skip_all, fields(proxies = proxies.len()))]
    pub async fn resolve(&self, proxies: Vec<ContractRecord>) -> Vec<Resolution> {
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::with_capacity(proxies.len());
        for (index, proxy) in proxies.into_iter().enumerate() {
            pending.insert(index, proxy.clone());
            let chain = Arc::clone(&self.chain);
            let slot = self.config.implementation_slot;
            tasks.spawn(async move {
                let value = chain.get_storage_at(proxy.address, slot).await;
                (index, proxy, value)
            });
        }

        let mut resolutions = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, proxy, value) = match joined {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(%err, "implementation lookup task failed");
                    continue;
                }
            };
            pending.remove(&index);

            let implementation = match value {
                Ok(value) => implementation_address(value)
                    .ok_or_else(|| UNRESOLVED_IMPLEMENTATION.to_string()),
                Err(err) => Err(format!("{UNRESOLVED_IMPLEMENTATION}: {err}")),
            };
            match &implementation {
                Ok(address) => {
                    debug!(proxy = %proxy.address, implementation = %address, "resolved")
                }
                Err(reason) => {
                    warn!(proxy = %proxy.address, %reason, "implementation not resolved")
                }
            }
            let resolution = Resolution {
                proxy,
                implementation,
            };
            resolutions.push((index, resolution));
        }

        // Lookups lost to a failed task still yield an unresolved proxy.
        for (index, proxy) in pending {
            let resolution = Resolution {
                proxy,
                implementation: Err(format!("{UNRESOLVED_IMPLEMENTATION}: lookup task failed")),
            };
            resolutions.push((index, resolution));
        }
        resolutions.sort_by_key(|(index, _)| *index);
        resolutions
            .into_iter()
            .map(|(_, resolution)| resolution)
            .collect()
    }

    /// Submits `work` to the verifier, at most `max_concurrency` at a time.
    #[instrument(skip_all, fields(records = work.len()))]
    pub async fn dispatch(&self, work: Vec<ContractRecord>) -> Vec<VerificationResult> {
        let gate = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        let mut pending = HashSet::with_capacity(work.len());
        for record in work {
            pending.insert(record.key());
            let verifier = Arc::clone(&self.verifier);
            let gate = Arc::clone(&gate);
            let retry = self.config.retry;
            tasks.spawn(async move {
                let Ok(_permit) = gate.acquire_owned().await else {
                    return VerificationResult::failed(
                        record.address,
                        record.source_path,
                        "dispatch cancelled",
                    );
                };
                verify_record(verifier.as_ref(), &record, retry).await
            });
        }

        let mut results = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => {
                    pending.remove(&result.key());
                    results.push(result);
                }
                Err(err) => warn!(%err, "verification task failed"),
            }
        }
        results.extend(pending.into_iter().map(|key| {
            VerificationResult::failed(key.address, key.source_path, "verification task failed")
        }));
        results
    }
}

/// Submits one record, resubmitting it as `retry` allows.
///
/// Only failures that may pass on a later attempt are resubmitted.
async fn verify_record<V: Verifier>(
    verifier: &V,
    record: &ContractRecord,
    retry: DispatchRetry,
) -> VerificationResult {
    info!(address = %record.address, source = %record.source_path, "submitting");
    let mut attempt = 1;
    loop {
        match verifier.verify(record).await {
            Ok(()) => {
                info!(address = %record.address, source = %record.source_path, "verified");
                return VerificationResult::verified(record);
            }
            Err(err) if err.is_retryable() && attempt < retry.max_attempts => {
                let delay = retry.backoff(attempt);
                warn!(
                    address = %record.address,
                    source = %record.source_path,
                    %err,
                    attempt,
                    ?delay,
                    "verification failed, resubmitting"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(
                    address = %record.address,
                    source = %record.source_path,
                    %err,
                    "verification failed"
                );
                return VerificationResult::failed(
                    record.address,
                    &record.source_path,
                    err.to_string(),
                );
            }
        }
    }
}
