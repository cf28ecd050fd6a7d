//! Core data structures for the roster crate.

use serde::{Deserialize, Serialize};

/// A single imported student identity.
///
/// All four fields are non-empty after a successful import, and `canvas_id`
/// is purely numeric (rows violating either rule are dropped by the parser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Canonicalized display name ("First Middle Last").
    pub name: String,
    /// Canvas user id, as shown in the grading UI's addressable state.
    pub canvas_id: String,
    /// Institutional user id (gradebook "SIS User ID" column).
    pub sis_user_id: String,
    /// Institutional login id; doubles as the PrairieLearn `user_uin`.
    pub sis_login_id: String,
}

/// Returns true when `value` trims to a non-empty all-digit string.
pub fn is_numeric_id(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_id() {
        assert!(is_numeric_id("12345"));
        assert!(is_numeric_id(" 7 "));
        assert!(!is_numeric_id(""));
        assert!(!is_numeric_id("   "));
        assert!(!is_numeric_id("12a45"));
        assert!(!is_numeric_id("Points Possible"));
    }
}
