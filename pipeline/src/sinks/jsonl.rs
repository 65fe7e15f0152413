use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::api::PipelineError;
use crate::sinks::RecordSink;

/// Line-delimited text append over a file, truncated at the start of each
/// run. The owner opens it for the duration of one run and must `flush()`
/// before dropping it.
pub struct JsonlSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl JsonlSink {
    pub async fn create(path: impl AsRef<Path>) -> Result<JsonlSink, PipelineError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).await.map_err(PipelineError::Sink)?;
        debug!(path = %path.display(), "opened sink");
        Ok(JsonlSink {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonlSink {
    async fn append(&mut self, line: &str) -> Result<(), PipelineError> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(PipelineError::Sink)?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(PipelineError::Sink)
    }

    async fn flush(&mut self) -> Result<(), PipelineError> {
        self.writer.flush().await.map_err(PipelineError::Sink)
    }
}
