use serde::Serialize;
use thiserror::Error;

/// Fatal conditions that abort a run. Per-record problems (decode or
/// validation failures) are never errors at this level; they are routed to
/// the dead-letter sink and counted.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read from the input stream: {0}")]
    Source(#[source] std::io::Error),

    #[error("failed to append to sink: {0}")]
    Sink(#[source] std::io::Error),

    #[error("failed to encode record for sink: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A fatal error plus whatever statistics were accumulated before the abort.
/// Only total source unavailability or a sink I/O failure produces this.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RunFailure {
    pub error: PipelineError,
    pub stats: RunStatistics,
}

/// Counters for one processing run. Reset only by starting a new run.
///
/// Blank input lines touch no counter, so `processed` always equals
/// `valid + duplicates + invalid`.
#[derive(Clone, Copy, Default, Debug, Serialize, Eq, PartialEq)]
pub struct RunStatistics {
    pub processed: u64,
    pub valid: u64,
    pub duplicates: u64,
    pub invalid: u64,
}

impl RunStatistics {
    pub fn total(&self) -> u64 {
        self.valid + self.duplicates + self.invalid
    }

    /// True when the accounting invariant holds.
    pub fn is_consistent(&self) -> bool {
        self.processed == self.total()
    }
}

#[cfg(test)]
mod tests {
    use super::RunStatistics;

    #[test]
    fn counters_start_at_zero() {
        let stats = RunStatistics::default();
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.total(), 0);
        assert!(stats.is_consistent());
    }

    #[test]
    fn consistency_requires_exact_breakdown() {
        let stats = RunStatistics {
            processed: 4,
            valid: 2,
            duplicates: 1,
            invalid: 1,
        };
        assert!(stats.is_consistent());

        let broken = RunStatistics { valid: 1, ..stats };
        assert!(!broken.is_consistent());
    }
}
