//! Circuit breaker for scan-history writes.
//!
//! After N consecutive failures the breaker opens and writes are skipped
//! until a cooldown expires. After the cooldown exactly one caller is let
//! through as a trial write, which either closes the circuit or re-opens it.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::{HISTORY_WRITE_COOLDOWN, HISTORY_WRITE_FAILURE_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

#[derive(Debug)]
struct Inner {
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Tracks consecutive history-write failures.
#[derive(Debug)]
pub struct HistoryWriteBreaker {
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<Inner>,
}

impl HistoryWriteBreaker {
    pub fn new() -> Self {
        Self::with_threshold(HISTORY_WRITE_FAILURE_THRESHOLD, HISTORY_WRITE_COOLDOWN)
    }

    pub fn with_threshold(failure_threshold: u32, cooldown: Duration) -> Self {
        HistoryWriteBreaker {
            failure_threshold: failure_threshold.max(1),
            cooldown,
            inner: Mutex::new(Inner {
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Current state, taking the cooldown into account.
    pub fn state(&self) -> BreakerState {
        let inner = self.lock();
        match inner.opened_at {
            None => BreakerState::Closed,
            Some(_) if inner.trial_in_flight => BreakerState::HalfOpen,
            Some(opened) if opened.elapsed() >= self.cooldown => BreakerState::HalfOpen,
            Some(_) => BreakerState::Open,
        }
    }

    /// Returns `false` when the write should be skipped.
    ///
    /// Once the cooldown has passed the first caller claims the trial write.
    /// Everyone else keeps being refused until that write is recorded. A trial
    /// that never reports back is given up after another cooldown.
    pub fn allow_write(&self) -> bool {
        let mut inner = self.lock();
        match inner.opened_at {
            None => true,
            Some(opened) if opened.elapsed() >= self.cooldown => {
                inner.opened_at = Some(Instant::now());
                inner.trial_in_flight = true;
                true
            }
            Some(_) => false,
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = 0;
        inner.trial_in_flight = false;
        if inner.opened_at.take().is_some() {
            log::info!("History write circuit closed after a successful write");
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);

        let half_open = inner.trial_in_flight
            || inner
                .opened_at
                .is_some_and(|opened| opened.elapsed() >= self.cooldown);
        let tripped =
            inner.opened_at.is_none() && inner.consecutive_failures >= self.failure_threshold;
        if half_open || tripped {
            inner.opened_at = Some(Instant::now());
            inner.trial_in_flight = false;
            log::error!(
                "History write circuit opened after {} consecutive failures (cooldown: {}s)",
                inner.consecutive_failures,
                self.cooldown.as_secs()
            );
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }
}

impl Default for HistoryWriteBreaker {
    fn default() -> Self {
        Self::new()
    }
}
