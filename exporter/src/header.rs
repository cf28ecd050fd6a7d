//! Audit header block.
//!
//! When enabled, every export is prefixed with a C block comment recording
//! who/what/when the content was fetched for. Downstream tooling parses
//! these files, so the field names and their order are a compatibility
//! surface — do not reorder or rename them.

use crate::selector::SelectedSubmission;
use crate::types::ProcessorOutput;
use chrono::Local;
use roster::RosterEntry;

/// Header emission mode, usually sourced from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderMode {
    Off,
    /// Identity, assessment/instance/question ids, selection diagnostics.
    #[default]
    Basic,
    /// `Basic` plus the submission's score breakdown fields.
    Scores,
}

impl HeaderMode {
    /// Parse a configuration string; unknown values mean `Basic` so a typo
    /// never silently drops the audit trail.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "off" | "false" | "none" | "" => HeaderMode::Off,
            "scores" => HeaderMode::Scores,
            _ => HeaderMode::Basic,
        }
    }
}

/// Everything the header needs, borrowed from the pipeline's stages.
pub struct HeaderContext<'a> {
    pub entry: &'a RosterEntry,
    pub assessment_id: &'a str,
    pub assessment_instance_id: &'a str,
    pub question_id: &'a str,
    pub selected: &'a SelectedSubmission,
    pub output: &'a ProcessorOutput,
}

/// Render the header block (including a trailing blank line), or an empty
/// string when the mode is `Off`.
pub fn build_header_block(mode: HeaderMode, ctx: &HeaderContext<'_>) -> String {
    if mode == HeaderMode::Off {
        return String::new();
    }

    let submission = &ctx.selected.submission;
    let mut lines = vec![
        "PrairieLearn Submission Export".to_string(),
        format!("Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        format!("Student: {}", ctx.entry.name),
        format!("Canvas ID: {}", ctx.entry.canvas_id),
        format!("SIS User ID: {}", ctx.entry.sis_user_id),
        format!("SIS Login ID (user_uin): {}", ctx.entry.sis_login_id),
        format!("assessment_id: {}", ctx.assessment_id),
        format!("assessment_instance_id: {}", ctx.assessment_instance_id),
        format!("question_id: {}", ctx.question_id),
        format!(
            "selected_submission_id: {} (candidates={}, strategy={})",
            submission.submission_id, ctx.selected.candidates, ctx.selected.strategy
        ),
        format!("submission_date: {}", submission.date.as_deref().unwrap_or("")),
    ];

    if mode == HeaderMode::Scores {
        let score_line = |label: &str, value: Option<f64>| {
            value.map(|v| format!("{label}: {v}"))
        };
        lines.extend(
            [
                score_line("points", submission.instance_question_points),
                score_line("auto_points", submission.instance_question_auto_points),
                score_line("manual_points", submission.instance_question_manual_points),
                score_line("max_points", submission.assessment_question_max_points),
            ]
            .into_iter()
            .flatten(),
        );
    }

    lines.push(format!("file: {}", ctx.output.file_name));

    let body = lines
        .iter()
        .map(|l| format!(" * {l}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("/**\n{body}\n */\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Strategy, Submission};

    fn context_fixture() -> (RosterEntry, SelectedSubmission, ProcessorOutput) {
        let entry = RosterEntry {
            name: "Jane Doe".to_string(),
            canvas_id: "1001".to_string(),
            sis_user_id: "u200100".to_string(),
            sis_login_id: "jdoe".to_string(),
        };
        let submission: Submission = serde_json::from_value(serde_json::json!({
            "submission_id": "s42",
            "question_id": "q7",
            "date": "2026-01-05T10:00:00Z",
            "instance_question_points": 8.5,
            "assessment_question_max_points": 10.0,
        }))
        .unwrap();
        let selected = SelectedSubmission {
            submission,
            candidates: 3,
            strategy: Strategy::Latest,
        };
        let output = ProcessorOutput {
            text: "body".to_string(),
            file_name: "main.c".to_string(),
        };
        (entry, selected, output)
    }

    #[test]
    fn test_off_mode_emits_nothing() {
        let (entry, selected, output) = context_fixture();
        let block = build_header_block(
            HeaderMode::Off,
            &HeaderContext {
                entry: &entry,
                assessment_id: "a1",
                assessment_instance_id: "ai-7",
                question_id: "q7",
                selected: &selected,
                output: &output,
            },
        );
        assert!(block.is_empty());
    }

    #[test]
    fn test_basic_field_order_is_stable() {
        let (entry, selected, output) = context_fixture();
        let block = build_header_block(
            HeaderMode::Basic,
            &HeaderContext {
                entry: &entry,
                assessment_id: "a1",
                assessment_instance_id: "ai-7",
                question_id: "q7",
                selected: &selected,
                output: &output,
            },
        );
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "/**");
        assert_eq!(lines[1], " * PrairieLearn Submission Export");
        assert!(lines[2].starts_with(" * Time: "));
        assert_eq!(lines[3], " * Student: Jane Doe");
        assert_eq!(lines[4], " * Canvas ID: 1001");
        assert_eq!(lines[5], " * SIS User ID: u200100");
        assert_eq!(lines[6], " * SIS Login ID (user_uin): jdoe");
        assert_eq!(lines[7], " * assessment_id: a1");
        assert_eq!(lines[8], " * assessment_instance_id: ai-7");
        assert_eq!(lines[9], " * question_id: q7");
        assert_eq!(
            lines[10],
            " * selected_submission_id: s42 (candidates=3, strategy=latest)"
        );
        assert_eq!(lines[11], " * submission_date: 2026-01-05T10:00:00Z");
        assert_eq!(lines[12], " * file: main.c");
        assert_eq!(lines[13], " */");
        assert!(block.ends_with(" */\n\n"));
    }

    #[test]
    fn test_scores_mode_adds_present_fields_only() {
        let (entry, selected, output) = context_fixture();
        let block = build_header_block(
            HeaderMode::Scores,
            &HeaderContext {
                entry: &entry,
                assessment_id: "a1",
                assessment_instance_id: "ai-7",
                question_id: "q7",
                selected: &selected,
                output: &output,
            },
        );
        assert!(block.contains(" * points: 8.5"));
        assert!(block.contains(" * max_points: 10"));
        // Absent on the fixture, so absent in the header.
        assert!(!block.contains("auto_points"));
        assert!(!block.contains("manual_points"));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(HeaderMode::from_config("off"), HeaderMode::Off);
        assert_eq!(HeaderMode::from_config(""), HeaderMode::Off);
        assert_eq!(HeaderMode::from_config("scores"), HeaderMode::Scores);
        assert_eq!(HeaderMode::from_config("basic"), HeaderMode::Basic);
        assert_eq!(HeaderMode::from_config("anything"), HeaderMode::Basic);
    }
}
