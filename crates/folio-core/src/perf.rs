#![forbid(unsafe_code)]

//! Long-task reporting.
//!
//! Hosts without performance observation never dispatch `LongTask` events,
//! so the monitor stays silent there.

#[derive(Debug, Clone)]
pub struct LongTaskMonitor {
    threshold_ms: f64,
    reported: u64,
}

impl LongTaskMonitor {
    #[must_use]
    pub fn new(threshold_ms: f64) -> Self {
        Self {
            threshold_ms,
            reported: 0,
        }
    }

    #[must_use]
    pub fn reported(&self) -> u64 {
        self.reported
    }

    /// Record one entry, warning when it is over threshold. Returns whether
    /// it was reported.
    pub fn record(&mut self, name: &str, duration_ms: f64) -> bool {
        if duration_ms <= self.threshold_ms {
            return false;
        }
        self.reported += 1;
        tracing::warn!(
            target: "folio.perf",
            name,
            duration_ms,
            "Long task detected: {name} ({duration_ms:.2}ms)"
        );
        true
    }
}
