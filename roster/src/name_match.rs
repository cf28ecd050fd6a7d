//! Name canonicalization and fuzzy matching.
//!
//! The grading UI displays names in "First Last" order and truncates long
//! names with an ellipsis; rosters usually store "Last, First". Matching has
//! to bridge both without producing false positives on short names.

/// Collapse runs of whitespace to single spaces and trim.
fn squash_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased, whitespace-collapsed canonical form used for comparisons.
fn normalize(value: &str) -> String {
    squash_whitespace(value).to_lowercase()
}

/// Converts "Last, First Middle" to "First Middle Last".
///
/// The reorder only applies when a comma splits the name into two non-empty
/// parts; anything else (including a leading or trailing comma) is returned
/// unchanged apart from whitespace collapsing and trimming.
pub fn canonicalize_name(name: &str) -> String {
    let raw = squash_whitespace(name);
    if raw.is_empty() {
        return raw;
    }
    if let Some((last, rest)) = raw.split_once(',') {
        let last = last.trim();
        let rest = rest.trim();
        if !last.is_empty() && !rest.is_empty() {
            return squash_whitespace(&format!("{rest} {last}"));
        }
    }
    raw
}

/// True when the name carries a UI truncation marker: an ellipsis character
/// anywhere, or three-or-more trailing dots.
fn has_truncation_marker(value: &str) -> bool {
    value.contains('\u{2026}') || value.trim_end().ends_with("...")
}

/// Remove truncation markers: every ellipsis character, and a trailing run
/// of three-or-more dots.
fn strip_truncation_marker(value: &str) -> String {
    let without_ellipsis: String = value.chars().filter(|c| *c != '\u{2026}').collect();
    let trimmed = without_ellipsis.trim_end();
    let trailing_dots = trimmed.chars().rev().take_while(|c| *c == '.').count();
    let kept = if trailing_dots >= 3 {
        &trimmed[..trimmed.len() - trailing_dots]
    } else {
        trimmed
    };
    kept.trim().to_string()
}

/// Fuzzy comparison of a UI-displayed name against a roster name.
///
/// Succeeds when:
/// 1. the canonical lowercase forms are equal;
/// 2. the displayed name is truncated and the stripped prefix matches the
///    roster name literally or token-wise (all tokens equal except the last
///    displayed token, which may be a prefix of its counterpart);
/// 3. the displayed canonical form is at least 10 characters long and is a
///    literal prefix of the roster canonical form.
///
/// Empty canonical forms never match.
pub fn names_match(displayed_name: &str, roster_name: &str) -> bool {
    let ui_canon = normalize(&canonicalize_name(displayed_name));
    let csv_canon = normalize(&canonicalize_name(roster_name));
    if ui_canon.is_empty() || csv_canon.is_empty() {
        return false;
    }
    if ui_canon == csv_canon {
        return true;
    }

    let ui_raw_canon = canonicalize_name(displayed_name);
    if has_truncation_marker(&ui_raw_canon) {
        let ui_stripped = normalize(&strip_truncation_marker(&ui_raw_canon));

        if !ui_stripped.is_empty() && csv_canon.starts_with(&ui_stripped) {
            return true;
        }

        let ui_tokens: Vec<&str> = ui_stripped.split_whitespace().collect();
        let csv_tokens: Vec<&str> = csv_canon.split_whitespace().collect();
        if !ui_tokens.is_empty()
            && !csv_tokens.is_empty()
            && ui_tokens.len() <= csv_tokens.len()
        {
            let last = ui_tokens.len() - 1;
            let ok = ui_tokens.iter().enumerate().all(|(i, ut)| {
                if i == last {
                    csv_tokens[i].starts_with(ut)
                } else {
                    *ut == csv_tokens[i]
                }
            });
            if ok {
                return true;
            }
        }
    }

    // Bare-prefix fallback, floored at 10 characters to avoid matching
    // short fragments against unrelated longer names.
    ui_canon.chars().count() >= 10 && csv_canon.starts_with(&ui_canon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_comma_reorder() {
        assert_eq!(canonicalize_name("Doe, Jane Q."), "Jane Q. Doe");
        assert_eq!(canonicalize_name("Jane Doe"), "Jane Doe");
        assert_eq!(canonicalize_name("  Jane   Doe  "), "Jane Doe");
        assert_eq!(canonicalize_name(""), "");
    }

    #[test]
    fn test_canonicalize_degenerate_commas() {
        // A comma that does not split two non-empty parts is left alone.
        assert_eq!(canonicalize_name(", Jane"), ", Jane");
        assert_eq!(canonicalize_name("Doe,"), "Doe,");
    }

    #[test]
    fn test_match_exact_after_canonicalization() {
        assert!(names_match("Doe, Jane", "Jane Doe"));
        assert!(names_match("jane doe", "Doe, Jane"));
    }

    #[test]
    fn test_match_ellipsis_prefix() {
        assert!(names_match("Jane D\u{2026}", "Jane Doe"));
        assert!(names_match("Jane D...", "Jane Doe"));
        assert!(names_match("Jane Doe\u{2026}", "Jane Doelittle Smith"));
    }

    #[test]
    fn test_match_ellipsis_tokenwise() {
        // Final displayed token only needs to be a prefix of its roster
        // counterpart; every earlier token must be an exact match.
        assert!(names_match("Jane Doeli\u{2026}", "Jane Doelittle"));
        assert!(!names_match("Janet D\u{2026}", "Jane Doe"));
        assert!(!names_match("Jane Doe Extra\u{2026}", "Jane Doe"));
    }

    #[test]
    fn test_no_match_short_fragment_without_marker() {
        assert!(!names_match("Jan", "Jane Doe"));
        assert!(!names_match("Jane Do", "Jane Doelittle"));
    }

    #[test]
    fn test_match_long_bare_prefix() {
        // 10+ characters, literal prefix, no marker required.
        assert!(names_match("Jane Middle", "Jane Middleton Doe"));
    }

    #[test]
    fn test_empty_names_never_match() {
        assert!(!names_match("", "Jane Doe"));
        assert!(!names_match("Jane Doe", "   "));
    }
}
