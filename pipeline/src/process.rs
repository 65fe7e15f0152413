use metrics::counter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::api::{PipelineError, RunFailure, RunStatistics};
use crate::dedup::IdempotencyTracker;
use crate::record::{DeadLetterEntry, RawRecord};
use crate::sinks::RecordSink;
use crate::validate::{validate, ValidationConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorConfig {
    pub validation: ValidationConfig,
    /// Per-line diagnostics. Changes log output only, never counters or
    /// routing.
    pub verbose: bool,
}

/// Single-pass consumer of one record stream. Owns the idempotency state and
/// the counters for exactly one run; build a fresh processor for the next.
pub struct StreamProcessor {
    config: ProcessorConfig,
    tracker: IdempotencyTracker,
    stats: RunStatistics,
}

impl StreamProcessor {
    pub fn new(config: ProcessorConfig) -> StreamProcessor {
        StreamProcessor {
            config,
            tracker: IdempotencyTracker::new(),
            stats: RunStatistics::default(),
        }
    }

    /// Decode, duplicate-check, validate and route every line of `reader`,
    /// in stream order. Per-line failures are routed to `dead_letter` and
    /// never abort the run; only source reads and sink writes are fatal, and
    /// a fatal error still carries the statistics accumulated so far.
    pub async fn process<'a, R>(
        mut self,
        reader: R,
        clean: &'a mut dyn RecordSink,
        dead_letter: &'a mut dyn RecordSink,
    ) -> Result<RunStatistics, RunFailure>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => return Err(self.fail(PipelineError::Source(e))),
            };

            if let Err(error) = self.process_line(&line, clean, dead_letter).await {
                return Err(self.fail(error));
            }
        }

        for sink in [clean, dead_letter] {
            if let Err(error) = sink.flush().await {
                return Err(self.fail(error));
            }
        }

        info!(
            processed = self.stats.processed,
            valid = self.stats.valid,
            duplicates = self.stats.duplicates,
            invalid = self.stats.invalid,
            "run complete"
        );
        debug_assert!(self.stats.is_consistent());
        Ok(self.stats)
    }

    async fn process_line(
        &mut self,
        line: &str,
        clean: &mut dyn RecordSink,
        dead_letter: &mut dyn RecordSink,
    ) -> Result<(), PipelineError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        self.stats.processed += 1;
        counter!("pipeline_records_processed_total").increment(1);

        // Ordinal of this line among non-blank lines, used for the identity
        // fallback when the key fields are missing.
        let ordinal = self.stats.processed;

        let record = match RawRecord::from_line(line) {
            Ok(record) => record,
            Err(cause) => {
                // Undecodable lines never reach the tracker: with no
                // identity they cannot be judged duplicates.
                let entry = DeadLetterEntry::undecodable(line, &cause);
                dead_letter.append(&serde_json::to_string(&entry)?).await?;
                self.stats.invalid += 1;
                counter!("pipeline_records_invalid_total").increment(1);
                if self.config.verbose {
                    warn!(ordinal, error = entry.error(), "dead-lettered");
                }
                return Ok(());
            }
        };

        let identity = record.identity(ordinal);

        if self.tracker.seen(&identity) {
            self.stats.duplicates += 1;
            counter!("pipeline_records_duplicate_total").increment(1);
            if self.config.verbose {
                info!(ordinal, identity = %identity, "duplicate skipped");
            }
            return Ok(());
        }

        match validate(&record, &self.config.validation) {
            Ok(valid) => {
                clean.append(&serde_json::to_string(&valid)?).await?;
                self.tracker.record(identity);
                self.stats.valid += 1;
                counter!("pipeline_records_valid_total").increment(1);
            }
            Err(reason) => {
                // Deliberately not recorded in the tracker: a duplicate of
                // an invalid record is re-validated and reported invalid
                // again, not as a duplicate.
                let entry = DeadLetterEntry::invalid(record, &reason);
                dead_letter.append(&serde_json::to_string(&entry)?).await?;
                self.stats.invalid += 1;
                counter!("pipeline_records_invalid_total").increment(1);
                if self.config.verbose {
                    warn!(ordinal, identity = %identity, error = entry.error(), "dead-lettered");
                }
            }
        }

        Ok(())
    }

    fn fail(&self, error: PipelineError) -> RunFailure {
        RunFailure {
            error,
            stats: self.stats,
        }
    }
}
