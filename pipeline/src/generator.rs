use std::path::Path;

use rand::Rng;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::record::RawRecord;
use crate::time::TimeSource;

/// Probabilities for the two independent per-record coin flips.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    pub fault_probability: f64,
    pub duplicate_probability: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            fault_probability: 0.20,
            duplicate_probability: 0.15,
        }
    }
}

/// The three mutually exclusive corruption variants, chosen uniformly when
/// the fault coin flip fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaultKind {
    Range,
    Format,
    MissingField,
}

impl FaultKind {
    fn pick<R: Rng + ?Sized>(rng: &mut R) -> FaultKind {
        match rng.gen_range(0..3) {
            0 => FaultKind::Range,
            1 => FaultKind::Format,
            _ => FaultKind::MissingField,
        }
    }
}

/// Manufacture an ordered stream of encoded records with injected faults and
/// duplicates. Pure given the rng and clock: no state survives the call.
///
/// Every record is emitted; a duplicate re-appends the just-emitted line
/// immediately after itself, so duplicates are always adjacent to their
/// original. A record can be both faulted and duplicated.
pub fn generate<R: Rng + ?Sized>(
    sensor_id: &str,
    sequence_start: i64,
    count: usize,
    config: &GeneratorConfig,
    rng: &mut R,
    clock: &dyn TimeSource,
) -> Vec<String> {
    let mut stream = Vec::with_capacity(count);

    for i in 0..count {
        let sequence_id = sequence_start + i as i64;

        let mut record = RawRecord {
            sensor_id: Some(sensor_id.to_string()),
            timestamp: Some(clock.unix_now()),
            sequence_id: Some(sequence_id),
            value: Some(json!(round2(rng.gen_range(20.0..30.0)))),
        };

        if rng.gen::<f64>() < config.fault_probability {
            let fault = FaultKind::pick(rng);
            tracing::debug!(sequence_id, ?fault, "injecting fault");
            match fault {
                FaultKind::Range => {
                    record.value = Some(json!(round2(rng.gen_range(500.0..5000.0))));
                }
                FaultKind::Format => {
                    record.value = Some(json!("ERROR_VAL"));
                }
                FaultKind::MissingField => {
                    record.value = None;
                }
            }
        }

        // RawRecord skips absent fields, so a missing-field fault encodes
        // without a `value` key rather than with a null.
        let line = serde_json::to_string(&record).expect("record serialization cannot fail");
        stream.push(line.clone());

        if rng.gen::<f64>() < config.duplicate_probability {
            tracing::debug!(sequence_id, "duplicating record");
            stream.push(line);
        }
    }

    tracing::info!(
        requested = count,
        emitted = stream.len(),
        "stream generation complete"
    );
    stream
}

/// Materialize a generated stream to a line-delimited file, one encoded
/// record per line.
pub async fn write_stream(path: impl AsRef<Path>, lines: &[String]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    for line in lines {
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
    }
    file.flush().await
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{generate, GeneratorConfig};
    use crate::record::RawRecord;
    use crate::time::FixedTime;

    const CLOCK: FixedTime = FixedTime(1_700_000_000);

    fn config(fault: f64, duplicate: f64) -> GeneratorConfig {
        GeneratorConfig {
            fault_probability: fault,
            duplicate_probability: duplicate,
        }
    }

    #[test]
    fn quiet_stream_is_clean_and_sequential() {
        let mut rng = StdRng::seed_from_u64(7);
        let stream = generate("LAB_01", 1000, 20, &config(0.0, 0.0), &mut rng, &CLOCK);

        assert_eq!(stream.len(), 20);
        for (i, line) in stream.iter().enumerate() {
            let record = RawRecord::from_line(line).unwrap();
            assert_eq!(record.sensor_id.as_deref(), Some("LAB_01"));
            assert_eq!(record.sequence_id, Some(1000 + i as i64));
            assert_eq!(record.timestamp, Some(1_700_000_000));

            // Rounding to 2 decimals can nudge a draw up to the bound.
            let value = record.value.unwrap().as_f64().unwrap();
            assert!((20.0..=30.0).contains(&value), "value {value} out of band");
        }
    }

    #[test]
    fn every_record_faulted_at_full_probability() {
        let mut rng = StdRng::seed_from_u64(11);
        let stream = generate("LAB_01", 0, 50, &config(1.0, 0.0), &mut rng, &CLOCK);

        assert_eq!(stream.len(), 50);
        for line in &stream {
            let record = RawRecord::from_line(line).unwrap();
            let corrupted = match record.value {
                None => true,
                Some(v) if v.is_string() => true,
                Some(v) => v.as_f64().unwrap() >= 500.0,
            };
            assert!(corrupted, "expected a fault in {line}");
        }
    }

    #[test]
    fn duplicates_are_adjacent_to_their_original() {
        let mut rng = StdRng::seed_from_u64(3);
        let stream = generate("LAB_01", 0, 25, &config(0.0, 1.0), &mut rng, &CLOCK);

        assert_eq!(stream.len(), 50);
        for pair in stream.chunks(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let config = GeneratorConfig::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        let first = generate("LAB_01", 500, 40, &config, &mut a, &CLOCK);
        let second = generate("LAB_01", 500, 40, &config, &mut b, &CLOCK);
        assert_eq!(first, second);
        assert!(first.len() >= 40);
    }
}
