//! Identity resolution.
//!
//! Matches the student currently shown in the grading UI (its addressable
//! Canvas user id, plus the displayed name when available) against the
//! imported roster, and derives the remote login id (`user_uin`). The
//! result is recomputed on every fetch and never persisted.

use roster::{RosterEntry, names_match};

/// Outcome of resolving the on-screen student against the roster.
#[derive(Debug, Clone)]
pub enum Resolution {
    Resolved {
        entry: RosterEntry,
        user_uin: String,
    },
    /// Resolution failed; `reasons` explains why, and `entry` carries the
    /// partial roster match when the id matched but a later check failed.
    Unresolved {
        reasons: Vec<String>,
        entry: Option<RosterEntry>,
    },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// Resolve a displayed student to a roster entry and its `user_uin`.
///
/// The Canvas user id is authoritative; the displayed name, when present,
/// is a cross-check against grading the wrong student (the UI may truncate
/// it, hence the fuzzy match). A blank displayed name skips the check.
pub fn resolve_identity(
    entries: &[RosterEntry],
    canvas_user_id: &str,
    displayed_name: Option<&str>,
) -> Resolution {
    let canvas_user_id = canvas_user_id.trim();
    if canvas_user_id.is_empty() {
        return Resolution::Unresolved {
            reasons: vec!["Canvas user id missing".to_string()],
            entry: None,
        };
    }

    let Some(entry) = entries.iter().find(|e| e.canvas_id == canvas_user_id) else {
        return Resolution::Unresolved {
            reasons: vec![format!("Canvas ID={canvas_user_id} not found in roster")],
            entry: None,
        };
    };

    if let Some(displayed) = displayed_name.map(str::trim).filter(|n| !n.is_empty()) {
        if !names_match(displayed, &entry.name) {
            return Resolution::Unresolved {
                reasons: vec![
                    "Name mismatch".to_string(),
                    format!("UI: {displayed}"),
                    format!("Roster: {}", entry.name),
                ],
                entry: Some(entry.clone()),
            };
        }
    }

    let user_uin = entry.sis_login_id.trim().to_string();
    if user_uin.is_empty() {
        return Resolution::Unresolved {
            reasons: vec!["Empty SIS Login ID (used as user_uin)".to_string()],
            entry: Some(entry.clone()),
        };
    }

    Resolution::Resolved {
        entry: entry.clone(),
        user_uin,
    }
}
