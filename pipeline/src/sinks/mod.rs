use async_trait::async_trait;

use crate::api::PipelineError;

pub mod jsonl;

/// An append-only destination for encoded records. One line in, one line
/// out; the sink never interprets the payload.
#[async_trait]
pub trait RecordSink: Send {
    async fn append(&mut self, line: &str) -> Result<(), PipelineError>;

    /// Push buffered lines to the underlying resource. A no-op for
    /// unbuffered sinks.
    async fn flush(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// In-memory sink for tests and embedding callers that want the lines back.
#[derive(Default, Debug)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn append(&mut self, line: &str) -> Result<(), PipelineError> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Discards everything. Useful when only the statistics matter.
pub struct NullSink {}

#[async_trait]
impl RecordSink for NullSink {
    async fn append(&mut self, _line: &str) -> Result<(), PipelineError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySink, RecordSink};

    #[tokio::test]
    async fn memory_sink_keeps_lines_in_order() {
        let mut sink = MemorySink::new();
        sink.append("first").await.unwrap();
        sink.append("second").await.unwrap();

        assert_eq!(sink.lines(), ["first", "second"]);
        assert_eq!(sink.len(), 2);
    }
}
