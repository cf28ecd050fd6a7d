//! Renders a text template against the structured answer fields.
//!
//! For questions whose answers live directly in `submitted_answer` (numeric
//! entries, multiple choice, matrix inputs) there is no file to extract;
//! instead a template like `"Result: ${bin_2digit._value.0}"` is rendered
//! by resolving each `${dot.separated.path}` against the answer object.

use crate::error::ExportError;
use crate::traits::processor::Processor;
use crate::types::{ProcessorOutput, Submission};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every rendered template is written under this fixed name.
const OUTPUT_FILE_NAME: &str = "submission.txt";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex"));

/// Typed parameters for [`TemplateProcessor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateParams {
    #[serde(default)]
    pub template: String,
    /// Joiner for resolved arrays.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Replacement for missing or null resolutions.
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_fallback() -> String {
    "[missing]".to_string()
}

impl Default for TemplateParams {
    fn default() -> Self {
        TemplateParams {
            template: String::new(),
            separator: default_separator(),
            fallback: default_fallback(),
        }
    }
}

impl TemplateParams {
    fn from_loose(raw: &Map<String, Value>) -> Self {
        let text = |key: &str, default: fn() -> String| match raw.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default(),
        };
        TemplateParams {
            template: text("template", String::new),
            separator: text("separator", default_separator),
            fallback: text("fallback", default_fallback),
        }
    }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

pub struct TemplateProcessor;

impl Processor for TemplateProcessor {
    fn kind(&self) -> &'static str {
        "template"
    }

    fn label(&self) -> &'static str {
        "Template extractor"
    }

    fn default_params(&self) -> Map<String, Value> {
        TemplateParams::default().to_map()
    }

    fn normalize(&self, raw: &Map<String, Value>) -> Map<String, Value> {
        TemplateParams::from_loose(raw).to_map()
    }

    fn validate(&self, params: &Map<String, Value>) -> Vec<String> {
        let params = TemplateParams::from_loose(params);
        if params.template.trim().is_empty() {
            vec!["template cannot be empty".to_string()]
        } else {
            Vec::new()
        }
    }

    fn summary(&self, _params: &Map<String, Value>) -> String {
        "template".to_string()
    }

    fn run(
        &self,
        submission: &Submission,
        raw_params: &Map<String, Value>,
    ) -> Result<ProcessorOutput, ExportError> {
        let params = TemplateParams::from_loose(raw_params);

        let answer = submission
            .submitted_answer
            .as_ref()
            .filter(|v| v.is_object())
            .ok_or_else(|| {
                ExportError::Processor(
                    "submitted_answer is missing or not an object".to_string(),
                )
            })?;

        let text = render_template(answer, &params);
        Ok(ProcessorOutput {
            text,
            file_name: OUTPUT_FILE_NAME.to_string(),
        })
    }
}

/// Replace every `${path}` placeholder with the stringified resolution of
/// `path` against `answer`, or the fallback when the path resolves to
/// nothing (or to JSON null).
fn render_template(answer: &Value, params: &TemplateParams) -> String {
    PLACEHOLDER
        .replace_all(&params.template, |caps: &regex::Captures<'_>| {
            let path = caps[1].trim();
            match resolve_path(answer, path) {
                None | Some(Value::Null) => params.fallback.clone(),
                Some(value) => value_to_string(value, &params.separator),
            }
        })
        .into_owned()
}

/// Walk a dot-separated path through the answer structure. Numeric segments
/// index into arrays; everything else is an object key lookup.
fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for part in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Stringify a resolved value: arrays join their recursively-stringified
/// elements with the separator, objects JSON-stringify, scalars print bare.
fn value_to_string(value: &Value, separator: &str) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| value_to_string(item, separator))
            .collect::<Vec<_>>()
            .join(separator),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(answer: Value) -> Submission {
        serde_json::from_value(serde_json::json!({
            "submission_id": "s1",
            "question_id": "q1",
            "submitted_answer": answer,
        }))
        .unwrap()
    }

    fn params(template: &str, separator: &str, fallback: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("template".to_string(), Value::from(template));
        map.insert("separator".to_string(), Value::from(separator));
        map.insert("fallback".to_string(), Value::from(fallback));
        map
    }

    #[test]
    fn test_array_index_and_fallback() {
        let sub = submission(serde_json::json!({ "a": [1, 2] }));
        let out = TemplateProcessor
            .run(&sub, &params("${a.0}-${b}", ",", "X"))
            .unwrap();
        assert_eq!(out.text, "1-X");
        assert_eq!(out.file_name, "submission.txt");
    }

    #[test]
    fn test_arrays_join_with_separator_recursively() {
        let sub = submission(serde_json::json!({ "grid": [[0, 1], [2, 3]] }));
        let out = TemplateProcessor
            .run(&sub, &params("${grid}", ";", "[missing]"))
            .unwrap();
        assert_eq!(out.text, "0;1;2;3");
    }

    #[test]
    fn test_objects_json_stringify_and_strings_print_bare() {
        let sub = submission(serde_json::json!({
            "obj": { "k": 1 },
            "word": "plain",
        }));
        let out = TemplateProcessor
            .run(&sub, &params("${obj} ${word}", ",", "?"))
            .unwrap();
        assert_eq!(out.text, "{\"k\":1} plain");
    }

    #[test]
    fn test_null_resolution_uses_fallback() {
        let sub = submission(serde_json::json!({ "n": null }));
        let out = TemplateProcessor
            .run(&sub, &params("v=${n}", ",", "[missing]"))
            .unwrap();
        assert_eq!(out.text, "v=[missing]");
    }

    #[test]
    fn test_nested_path_with_dot_segments() {
        let sub = submission(serde_json::json!({
            "bin_2digit": { "_value": [7, 8] }
        }));
        let out = TemplateProcessor
            .run(&sub, &params("${bin_2digit._value.1}", ",", "X"))
            .unwrap();
        assert_eq!(out.text, "8");
    }

    #[test]
    fn test_non_object_answer_is_an_error() {
        let sub: Submission = serde_json::from_value(serde_json::json!({
            "submission_id": "s1",
            "question_id": "q1",
        }))
        .unwrap();
        let err = TemplateProcessor
            .run(&sub, &params("${a}", ",", "X"))
            .unwrap_err();
        assert!(err.to_string().contains("missing or not an object"));
    }

    #[test]
    fn test_validate_rejects_blank_template() {
        let errors = TemplateProcessor.validate(&params("   ", ",", "X"));
        assert_eq!(errors, vec!["template cannot be empty".to_string()]);
        assert!(TemplateProcessor.validate(&params("${a}", ",", "X")).is_empty());
    }
}
