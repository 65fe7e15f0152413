use anyhow::Context;
use envconfig::Envconfig;
use tokio::fs::File;
use tokio::io::BufReader;

use pipeline::config::Config;
use pipeline::generator;
use pipeline::process::StreamProcessor;
use pipeline::sinks::jsonl::JsonlSink;
use pipeline::time::SystemTime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::init_from_env().context("invalid configuration")?;

    // Stage 1: manufacture the unreliable input stream.
    let stream = generator::generate(
        &config.sensor_id,
        config.sequence_start,
        config.record_count,
        &config.generator(),
        &mut rand::thread_rng(),
        &SystemTime {},
    );
    generator::write_stream(&config.input_path, &stream)
        .await
        .with_context(|| format!("failed to write {}", config.input_path))?;

    // Stage 2: process it. A missing input file is the one fatal source
    // condition; everything per-line is recovered into the dead-letter sink.
    let input = File::open(&config.input_path)
        .await
        .with_context(|| format!("input stream unavailable: {}", config.input_path))?;

    let mut clean = JsonlSink::create(&config.clean_path).await?;
    let mut dead_letter = JsonlSink::create(&config.dead_letter_path).await?;

    let stats = StreamProcessor::new(config.processor())
        .process(BufReader::new(input), &mut clean, &mut dead_letter)
        .await
        .map_err(|failure| {
            tracing::error!(stats = ?failure.stats, "run aborted");
            anyhow::Error::new(failure.error)
        })?;

    tracing::info!(
        processed = stats.processed,
        valid = stats.valid,
        duplicates = stats.duplicates,
        invalid = stats.invalid,
        clean = %config.clean_path,
        dead_letter = %config.dead_letter_path,
        "pipeline finished"
    );

    Ok(())
}
