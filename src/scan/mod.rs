//! Scan orchestration.
//!
//! One scan walks Received -> Validating -> {Rejected | Probing} ->
//! {TimedOut | NetworkFailed | Succeeded} -> (optional) Persisting ->
//! Completed. Nothing loops back: there are no retries.
//!
//! Persisting only happens for callers with an identity, runs in a detached
//! task and can never change the answer the caller gets.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use log::{debug, info, warn};
use url::Url;

use crate::error_handling::{
    DatabaseError, HistoryWriteOutcome, ProbeError, ScanError, ScanOutcome, ScanStats,
};
use crate::models::{Identity, ScanRequest, ScanResult};
use crate::probe::{ProbeOutcome, SiteProber};
use crate::security::{ensure_public_target, validate_scan_url};
use crate::storage::{HistoryStore, HistoryWriteBreaker};

/// What the scan endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResponse {
    pub status: StatusCode,
    pub result: ScanResult,
}

/// Runs scans against a prober and records them in a history store.
pub struct Scanner {
    prober: Arc<dyn SiteProber>,
    history: Arc<dyn HistoryStore>,
    stats: Arc<ScanStats>,
    breaker: Arc<HistoryWriteBreaker>,
    timeout: Duration,
    block_private_targets: bool,
}

impl Scanner {
    pub fn new(
        prober: Arc<dyn SiteProber>,
        history: Arc<dyn HistoryStore>,
        stats: Arc<ScanStats>,
        timeout: Duration,
    ) -> Self {
        Scanner {
            prober,
            history,
            stats,
            breaker: Arc::new(HistoryWriteBreaker::new()),
            timeout,
            block_private_targets: false,
        }
    }

    /// Rejects local and private targets before probing.
    pub fn with_private_target_blocking(mut self, block: bool) -> Self {
        self.block_private_targets = block;
        self
    }

    pub fn with_breaker(mut self, breaker: Arc<HistoryWriteBreaker>) -> Self {
        self.breaker = breaker;
        self
    }

    pub fn breaker(&self) -> &HistoryWriteBreaker {
        &self.breaker
    }

    /// Scans `request.url` on behalf of `identity` (`None` for anonymous).
    ///
    /// Never fails: every error becomes a `{success:false, error}` result with
    /// the matching HTTP status.
    pub async fn run_scan(
        &self,
        request: &ScanRequest,
        identity: Option<&Identity>,
    ) -> ScanResponse {
        match self.scan(request).await {
            Ok(outcome) => {
                info!(
                    "Scanned {} (status {}, {} headers)",
                    outcome.final_url,
                    outcome.status,
                    outcome.headers.len()
                );
                self.stats.record_outcome(ScanOutcome::Succeeded);
                let result = ScanResult::succeeded(outcome.https, outcome.headers);
                if let Some(identity) = identity {
                    self.persist(identity, &request.url, &result);
                }
                ScanResponse {
                    status: StatusCode::OK,
                    result,
                }
            }
            Err(err) => {
                match &err {
                    rejected if rejected.is_client_error() => {
                        debug!("Scan of {:?} rejected: {rejected}", request.url)
                    }
                    ScanError::Internal(detail) => {
                        warn!("Scan of {:?} failed: {detail}", request.url)
                    }
                    ScanError::NetworkError(detail) => {
                        info!("Scan of {:?} failed: {detail}", request.url)
                    }
                    other => info!("Scan of {:?} not completed: {other}", request.url),
                }
                self.stats.record_outcome(err.outcome());
                ScanResponse {
                    status: err.status_code(),
                    result: ScanResult::failed(&err),
                }
            }
        }
    }

    /// Answer for a request rejected before it became a `ScanRequest`.
    pub fn reject(&self, err: ScanError) -> ScanResponse {
        debug!("Rejected scan request: {err}");
        self.stats.record_outcome(err.outcome());
        ScanResponse {
            status: err.status_code(),
            result: ScanResult::failed(&err),
        }
    }

    async fn scan(&self, request: &ScanRequest) -> Result<ProbeOutcome, ScanError> {
        let url = validate_scan_url(&request.url)?;
        if self.block_private_targets {
            ensure_public_target(&url)?;
        }
        self.probe(url).await
    }

    /// Runs the probe in its own task; a panic there surfaces as `Internal`.
    /// The deadline is enforced here as well as in the prober.
    async fn probe(&self, url: Url) -> Result<ProbeOutcome, ScanError> {
        let prober = Arc::clone(&self.prober);
        let timeout = self.timeout;
        let mut handle = tokio::spawn(async move { prober.probe(&url, timeout).await });

        let joined = match tokio::time::timeout(timeout, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                return Err(ScanError::Timeout);
            }
        };

        match joined {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(err)) => {
                if let ProbeError::NetworkError { kind, .. } = &err {
                    self.stats.record_network_error(*kind);
                }
                Err(err.into())
            }
            Err(join_err) => Err(ScanError::Internal(format!("probe task failed: {join_err}"))),
        }
    }

    /// Stores the result in the caller's history without waiting for it.
    fn persist(&self, identity: &Identity, url: &str, result: &ScanResult) {
        let serialized = match serde_json::to_string(result) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to save scan history: {}", DatabaseError::from(e));
                self.stats.record_history_write(HistoryWriteOutcome::Failed);
                return;
            }
        };

        if !self.breaker.allow_write() {
            debug!("History write circuit open, not saving scan of {url}");
            self.stats.record_history_write(HistoryWriteOutcome::Skipped);
            return;
        }

        let history = Arc::clone(&self.history);
        let stats = Arc::clone(&self.stats);
        let breaker = Arc::clone(&self.breaker);
        let owner_id = identity.id.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            match history.create(&owner_id, &url, &serialized).await {
                Ok(id) => {
                    breaker.record_success();
                    stats.record_history_write(HistoryWriteOutcome::Saved);
                    debug!("Saved scan {id} of {url}");
                }
                Err(e) => {
                    breaker.record_failure();
                    stats.record_history_write(HistoryWriteOutcome::Failed);
                    warn!("Failed to save scan history for {owner_id}: {e}");
                }
            }
        });
    }
}
