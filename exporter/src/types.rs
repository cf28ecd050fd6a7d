//! # Types Module
//!
//! Core data structures shared across the exporter: the remote submission
//! model, per-question export rules, selection strategies, and processor
//! configuration/output shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use validator::Validate;

/// One assessment attempt on the remote platform, as returned by the
/// instance-listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentInstance {
    #[serde(deserialize_with = "string_or_number")]
    pub assessment_instance_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_uin: String,
}

/// A raw submission record from the remote platform.
///
/// `submitted_answer` is deliberately opaque JSON: its shape depends on the
/// question type and is only interpreted by processors. Score fields are
/// optional because the API omits them for ungraded submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    #[serde(deserialize_with = "string_or_number")]
    pub submission_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub question_id: String,
    /// RFC 3339 submission timestamp; absent or unparseable dates count as
    /// the epoch during `latest` selection.
    #[serde(default)]
    pub date: Option<String>,
    /// Flag set by the platform on the one submission it considers the
    /// authoritative/best attempt. Drives [`Strategy::Best`].
    #[serde(default)]
    pub best_submission: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub instance_question_points: Option<f64>,
    #[serde(default)]
    pub instance_question_auto_points: Option<f64>,
    #[serde(default)]
    pub instance_question_manual_points: Option<f64>,
    #[serde(default)]
    pub assessment_question_max_points: Option<f64>,
    #[serde(default)]
    pub submitted_answer: Option<Value>,
}

impl Submission {
    /// Parsed submission timestamp, epoch when missing or unparseable.
    pub fn parsed_date(&self) -> DateTime<Utc> {
        self.date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Named policy for picking exactly one submission among the candidates for
/// a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Maximum parsed timestamp; ties go to the later-encountered candidate.
    #[default]
    Latest,
    /// The unique candidate whose `best_submission` flag is set. The config
    /// spelling `api-best` is accepted as an alias.
    #[serde(alias = "api-best")]
    Best,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Latest => write!(f, "latest"),
            Strategy::Best => write!(f, "best"),
        }
    }
}

/// Loosely-typed processor configuration as stored in the rules file. The
/// registry resolves `kind` to a descriptor which normalizes `params` into
/// its own typed shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessorConfig {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Result of a successful processor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorOutput {
    pub text: String,
    pub file_name: String,
}

/// Per-question export configuration (which assessment to look in, how to
/// pick among multiple submissions, how to turn the pick into text).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExportRule {
    #[validate(length(min = 1, message = "question_id cannot be empty"))]
    pub question_id: String,
    #[validate(length(min = 1, message = "assessment_id cannot be empty"))]
    pub assessment_id: String,
    #[serde(default, rename = "multi_submissions")]
    pub strategy: Strategy,
    #[serde(default)]
    pub processor: ProcessorConfig,
}

/// Accept both `"123"` and `123` for remote identifiers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_ids_accept_numbers_and_strings() {
        let s: Submission = serde_json::from_str(
            r#"{"submission_id": 42, "question_id": "q7", "date": "2026-01-05T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(s.submission_id, "42");
        assert_eq!(s.question_id, "q7");
        assert!(s.best_submission.is_none());
    }

    #[test]
    fn test_parsed_date_falls_back_to_epoch() {
        let s: Submission =
            serde_json::from_str(r#"{"submission_id": "1", "date": "not-a-date"}"#).unwrap();
        assert_eq!(s.parsed_date().timestamp(), 0);
        let s: Submission = serde_json::from_str(r#"{"submission_id": "1"}"#).unwrap();
        assert_eq!(s.parsed_date().timestamp(), 0);
    }

    #[test]
    fn test_strategy_config_spellings() {
        assert_eq!(
            serde_json::from_str::<Strategy>("\"latest\"").unwrap(),
            Strategy::Latest
        );
        assert_eq!(
            serde_json::from_str::<Strategy>("\"best\"").unwrap(),
            Strategy::Best
        );
        assert_eq!(
            serde_json::from_str::<Strategy>("\"api-best\"").unwrap(),
            Strategy::Best
        );
    }

    #[test]
    fn test_rule_validation_rejects_blank_ids() {
        let rule = ExportRule {
            question_id: String::new(),
            assessment_id: "a1".to_string(),
            strategy: Strategy::Latest,
            processor: ProcessorConfig::default(),
        };
        assert!(rule.validate().is_err());
    }
}
