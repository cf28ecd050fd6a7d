//! Processor registry.
//!
//! Maps a configuration type tag to a [`Processor`] descriptor. The
//! registry is open: callers may register additional processors instead of
//! subclassing anything. Unknown tags are forgiven while *normalizing* a
//! config (editing convenience: they fall back to the file extractor) but
//! are a hard error at *execution* time.

pub mod file_processor;
pub mod template_processor;

pub use file_processor::{FileParams, FileProcessor};
pub use template_processor::{TemplateParams, TemplateProcessor};

use crate::error::ExportError;
use crate::traits::processor::Processor;
use crate::types::{ProcessorConfig, ProcessorOutput, Submission};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct ProcessorRegistry {
    by_kind: BTreeMap<String, Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    /// Registry preloaded with the built-in file and template extractors.
    pub fn with_builtins() -> Self {
        let mut registry = ProcessorRegistry {
            by_kind: BTreeMap::new(),
        };
        registry.register(Arc::new(FileProcessor));
        registry.register(Arc::new(TemplateProcessor));
        registry
    }

    pub fn register(&mut self, processor: Arc<dyn Processor>) {
        self.by_kind.insert(processor.kind().to_string(), processor);
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<dyn Processor>> {
        self.by_kind.get(kind.trim())
    }

    /// All registered descriptors, in stable tag order.
    pub fn list(&self) -> impl Iterator<Item = &Arc<dyn Processor>> {
        self.by_kind.values()
    }

    /// Canonicalize a stored config. An unset or unrecognized type falls
    /// back to the file extractor — this leniency exists only so half-built
    /// rules stay editable; execution never applies it.
    pub fn normalize_config(&self, raw: &ProcessorConfig) -> ProcessorConfig {
        let descriptor = self
            .get(&raw.kind)
            .or_else(|| self.get("file"))
            .expect("file processor registered");
        ProcessorConfig {
            kind: descriptor.kind().to_string(),
            params: descriptor.normalize(&raw.params),
        }
    }

    /// One-line description of a config for rule listings.
    pub fn summary(&self, config: &ProcessorConfig) -> String {
        match self.get(&config.kind) {
            Some(descriptor) => descriptor.summary(&descriptor.normalize(&config.params)),
            None => config.kind.clone(),
        }
    }

    /// Configuration-time validation. Unknown types are reported here (not
    /// silently normalized away) so a rule never reaches execution broken.
    /// Validation sees the *raw* params: normalizing first would coerce away
    /// exactly the mistakes this is meant to report.
    pub fn validate_config(&self, config: &ProcessorConfig) -> Vec<String> {
        match self.get(&config.kind) {
            Some(descriptor) => descriptor.validate(&config.params),
            None => vec![format!("Unknown processor type: {}", config.kind)],
        }
    }

    /// Execute the configured processor. Unknown types are a hard error.
    pub fn run(
        &self,
        submission: &Submission,
        config: &ProcessorConfig,
    ) -> Result<ProcessorOutput, ExportError> {
        let descriptor = self.get(&config.kind).ok_or_else(|| {
            ExportError::Processor(format!("processor.type={} not supported", config.kind))
        })?;
        descriptor.run(submission, &config.params)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    #[test]
    fn test_unknown_type_is_a_hard_error_at_run_time() {
        let registry = ProcessorRegistry::with_builtins();
        let submission: Submission = serde_json::from_value(serde_json::json!({
            "submission_id": "s1",
            "question_id": "q1",
        }))
        .unwrap();
        let config = ProcessorConfig {
            kind: "mystery".to_string(),
            params: Map::new(),
        };
        let err = registry.run(&submission, &config).unwrap_err();
        assert!(err.to_string().contains("processor.type=mystery not supported"));
    }

    #[test]
    fn test_normalize_defaults_unknown_type_to_file() {
        let registry = ProcessorRegistry::with_builtins();
        let config = ProcessorConfig {
            kind: "mystery".to_string(),
            params: Map::new(),
        };
        let normalized = registry.normalize_config(&config);
        assert_eq!(normalized.kind, "file");
        assert_eq!(normalized.params.get("file_index"), Some(&Value::from(0)));
    }

    #[test]
    fn test_validate_reports_unknown_type() {
        let registry = ProcessorRegistry::with_builtins();
        let config = ProcessorConfig {
            kind: "mystery".to_string(),
            params: Map::new(),
        };
        assert_eq!(
            registry.validate_config(&config),
            vec!["Unknown processor type: mystery".to_string()]
        );
    }

    #[test]
    fn test_validate_sees_raw_params() {
        // A negative index is clamped by normalization, so validation must
        // run against the stored bag to ever report it.
        let registry = ProcessorRegistry::with_builtins();
        let mut params = Map::new();
        params.insert("file_index".to_string(), Value::from(-1));
        let config = ProcessorConfig {
            kind: "file".to_string(),
            params,
        };
        assert_eq!(
            registry.validate_config(&config),
            vec!["file_index must be a non-negative number".to_string()]
        );
    }

    #[test]
    fn test_summaries() {
        let registry = ProcessorRegistry::with_builtins();
        let mut params = Map::new();
        params.insert("file_index".to_string(), Value::from(3));
        let file = ProcessorConfig {
            kind: "file".to_string(),
            params,
        };
        assert_eq!(registry.summary(&file), "file (3)");
        let template = ProcessorConfig {
            kind: "template".to_string(),
            params: Map::new(),
        };
        assert_eq!(registry.summary(&template), "template");
    }
}
