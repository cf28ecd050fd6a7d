//! File output sink.

use async_trait::async_trait;
use exporter::error::ExportError;
use exporter::traits::OutputSink;
use std::path::PathBuf;

/// Writes the export to one local file, replacing its contents.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSink { path: path.into() }
    }
}

#[async_trait]
impl OutputSink for FileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn write_text(&self, text: &str) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExportError::Output(format!("create {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| ExportError::Output(format!("write {}: {e}", self.path.display())))
    }
}
