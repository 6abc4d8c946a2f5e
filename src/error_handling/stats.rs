//! Scan statistics tracking.
//!
//! Thread-safe counters for scan outcomes, probe network failure classes and
//! history writes. Shared by every request handler through `Arc`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use strum::IntoEnumIterator;

use super::types::{HistoryWriteOutcome, NetworkErrorKind, ScanOutcome};

/// Thread-safe scan statistics tracker.
///
/// Every enum variant is registered with a zero counter on creation, so
/// lookups never miss.
pub struct ScanStats {
    outcomes: HashMap<ScanOutcome, AtomicUsize>,
    network_errors: HashMap<NetworkErrorKind, AtomicUsize>,
    history_writes: HashMap<HistoryWriteOutcome, AtomicUsize>,
    started_at: Instant,
}

impl ScanStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in ScanOutcome::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }

        let mut network_errors = HashMap::new();
        for kind in NetworkErrorKind::iter() {
            network_errors.insert(kind, AtomicUsize::new(0));
        }

        let mut history_writes = HashMap::new();
        for outcome in HistoryWriteOutcome::iter() {
            history_writes.insert(outcome, AtomicUsize::new(0));
        }

        ScanStats {
            outcomes,
            network_errors,
            history_writes,
            started_at: Instant::now(),
        }
    }

    pub fn record_outcome(&self, outcome: ScanOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("No counter registered for scan outcome {:?}", outcome);
        }
    }

    pub fn record_network_error(&self, kind: NetworkErrorKind) {
        if let Some(counter) = self.network_errors.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("No counter registered for network error kind {:?}", kind);
        }
    }

    pub fn record_history_write(&self, outcome: HistoryWriteOutcome) {
        if let Some(counter) = self.history_writes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("No counter registered for history write {:?}", outcome);
        }
    }

    pub fn outcome_count(&self, outcome: ScanOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn network_error_count(&self, kind: NetworkErrorKind) -> usize {
        self.network_errors
            .get(&kind)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn history_write_count(&self, outcome: HistoryWriteOutcome) -> usize {
        self.history_writes
            .get(&outcome)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Total scans that reached a terminal state.
    pub fn total_scans(&self) -> usize {
        self.outcomes
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}
