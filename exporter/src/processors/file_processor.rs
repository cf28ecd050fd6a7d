//! Extracts one uploaded file from a file-upload question's answer.
//!
//! File-upload questions attach their uploads under
//! `submitted_answer._files` as `{ name, contents }` pairs with
//! base64-encoded contents. This processor picks one by index and decodes
//! it to UTF-8 text (lenient: invalid sequences are replaced, never fatal).

use crate::error::ExportError;
use crate::traits::processor::Processor;
use crate::types::{ProcessorOutput, Submission};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Typed parameters for [`FileProcessor`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileParams {
    /// 0-based index into `submitted_answer._files`.
    #[serde(default)]
    pub file_index: usize,
}

impl FileParams {
    /// Coerce a loose parameter bag: numbers are taken as-is, numeric
    /// strings are parsed, anything else falls back to index 0.
    fn from_loose(raw: &Map<String, Value>) -> Self {
        let file_index = match raw.get("file_index") {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as usize,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        };
        FileParams { file_index }
    }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// One `{ name, contents }` pair under `submitted_answer._files`.
#[derive(Debug, Clone, Deserialize)]
struct AttachedFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    contents: String,
}

pub struct FileProcessor;

impl Processor for FileProcessor {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn label(&self) -> &'static str {
        "File extractor"
    }

    fn default_params(&self) -> Map<String, Value> {
        FileParams::default().to_map()
    }

    fn normalize(&self, raw: &Map<String, Value>) -> Map<String, Value> {
        FileParams::from_loose(raw).to_map()
    }

    fn validate(&self, params: &Map<String, Value>) -> Vec<String> {
        // Inspect the raw value: `from_loose` clamps bad indices to 0, which
        // is fine at run time but would hide the mistake from rule listings.
        let ok = match params.get("file_index") {
            None => true,
            Some(Value::Number(n)) => n.as_u64().is_some(),
            Some(Value::String(s)) => s.trim().parse::<u64>().is_ok(),
            Some(_) => false,
        };
        if ok {
            Vec::new()
        } else {
            vec!["file_index must be a non-negative number".to_string()]
        }
    }

    fn summary(&self, params: &Map<String, Value>) -> String {
        format!("file ({})", FileParams::from_loose(params).file_index)
    }

    fn run(
        &self,
        submission: &Submission,
        raw_params: &Map<String, Value>,
    ) -> Result<ProcessorOutput, ExportError> {
        let params = FileParams::from_loose(raw_params);

        let files_value = submission
            .submitted_answer
            .as_ref()
            .and_then(|a| a.get("_files"))
            .filter(|v| v.is_array())
            .ok_or_else(|| {
                ExportError::Processor(
                    "submitted_answer._files missing (not a file-upload question?)".to_string(),
                )
            })?;
        let files: Vec<AttachedFile> = serde_json::from_value(files_value.clone())
            .map_err(|e| ExportError::Processor(format!("submitted_answer._files malformed: {e}")))?;

        let idx = params.file_index;
        if idx >= files.len() {
            return Err(ExportError::Processor(format!(
                "file_index={idx} out of range (files={})",
                files.len()
            )));
        }

        let file = &files[idx];
        let name = file
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("file_{idx}"));
        if file.contents.is_empty() {
            return Err(ExportError::Processor("File contents empty".to_string()));
        }

        let text = decode_base64_utf8(&file.contents)?;
        Ok(ProcessorOutput {
            text,
            file_name: name,
        })
    }
}

/// Base64-decode, tolerating surrounding whitespace, then decode the bytes
/// as UTF-8 with replacement (a corrupt upload still yields text).
fn decode_base64_utf8(contents: &str) -> Result<String, ExportError> {
    let cleaned: String = contents.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| ExportError::Processor(format!("Base64 decode failed: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
