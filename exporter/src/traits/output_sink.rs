use crate::error::ExportError;
use async_trait::async_trait;

/// Destination for the final export text. The pipeline writes exactly once,
/// and only after every prior stage has succeeded.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Short human description of the destination (shown in status lines).
    fn describe(&self) -> String;

    /// Replace the destination's contents with `text`.
    async fn write_text(&self, text: &str) -> Result<(), ExportError>;
}
