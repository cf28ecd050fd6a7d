use crate::error::ExportError;
use crate::types::{ProcessorOutput, Submission};
use serde_json::{Map, Value};

/// Processor is a strategy trait for turning a selected submission into
/// exportable text. Each implementation owns a strongly-typed parameter
/// struct internally; the trait surface speaks the loose JSON bag the rules
/// file stores, and `normalize` is the bridge between the two.
pub trait Processor: Send + Sync {
    /// Type tag used in rule configuration (`"file"`, `"template"`, ...).
    fn kind(&self) -> &'static str;

    /// Human-readable name for listings.
    fn label(&self) -> &'static str;

    /// The canonical parameter bag for a freshly created rule.
    fn default_params(&self) -> Map<String, Value>;

    /// Coerce a loose parameter bag into this processor's canonical shape,
    /// filling defaults for missing or malformed values.
    fn normalize(&self, raw: &Map<String, Value>) -> Map<String, Value>;

    /// Configuration-time checks on the raw parameter bag, before
    /// `normalize` coerces away anything suspicious. Empty means ok.
    fn validate(&self, params: &Map<String, Value>) -> Vec<String>;

    /// Short one-line description of a configuration, for rule listings.
    fn summary(&self, params: &Map<String, Value>) -> String;

    /// Transform the submission. `raw_params` is normalized internally, so
    /// callers may pass the bag exactly as stored.
    fn run(
        &self,
        submission: &Submission,
        raw_params: &Map<String, Value>,
    ) -> Result<ProcessorOutput, ExportError>;
}
