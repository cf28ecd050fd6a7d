//! Submission selection.
//!
//! A remote instance usually carries several submissions per question; the
//! selector reduces them to exactly one according to the rule's strategy,
//! or refuses with a descriptive error rather than guessing.

use crate::error::ExportError;
use crate::types::{Strategy, Submission};

/// A successful pick, with the number of candidates considered for the
/// audit header.
#[derive(Debug, Clone)]
pub struct SelectedSubmission {
    pub submission: Submission,
    pub candidates: usize,
    pub strategy: Strategy,
}

/// Pick exactly one submission for `question_id` per `strategy`.
///
/// Candidates are the submissions whose (trimmed) question id matches
/// exactly. `Latest` takes the maximum parsed timestamp, ties going to the
/// later-encountered candidate; missing or unparseable dates sort as the
/// epoch. `Best` requires exactly one candidate flagged `best_submission`
/// and errors on zero or several.
pub fn select_submission(
    submissions: &[Submission],
    question_id: &str,
    strategy: Strategy,
) -> Result<SelectedSubmission, ExportError> {
    let qid = question_id.trim();
    let hits: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.question_id.trim() == qid)
        .collect();

    if hits.is_empty() {
        return Err(ExportError::Selection(format!(
            "no submission for question_id={qid}"
        )));
    }

    let picked = match strategy {
        Strategy::Latest => {
            let mut best = hits[0];
            let mut best_at = best.parsed_date();
            for &hit in &hits[1..] {
                let at = hit.parsed_date();
                if at >= best_at {
                    best = hit;
                    best_at = at;
                }
            }
            best
        }
        Strategy::Best => {
            let flagged: Vec<&Submission> = hits
                .iter()
                .copied()
                .filter(|s| s.best_submission == Some(true))
                .collect();
            match flagged.as_slice() {
                [] => {
                    return Err(ExportError::Selection(format!(
                        "no submission flagged best_submission (candidates={})",
                        hits.len()
                    )));
                }
                [one] => *one,
                many => {
                    return Err(ExportError::Selection(format!(
                        "ambiguous best selection: {} submissions flagged best_submission",
                        many.len()
                    )));
                }
            }
        }
    };

    Ok(SelectedSubmission {
        submission: picked.clone(),
        candidates: hits.len(),
        strategy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: &str, qid: &str, date: Option<&str>, best: Option<bool>) -> Submission {
        serde_json::from_value(serde_json::json!({
            "submission_id": id,
            "question_id": qid,
            "date": date,
            "best_submission": best,
        }))
        .unwrap()
    }

    #[test]
    fn test_no_candidate_for_question() {
        let subs = vec![submission("s1", "other", None, None)];
        let err = select_submission(&subs, "q1", Strategy::Latest).unwrap_err();
        assert!(err.to_string().contains("no submission for question_id=q1"));
    }

    #[test]
    fn test_latest_picks_maximum_timestamp() {
        let subs = vec![
            submission("s1", "q1", Some("2026-01-05T10:00:00Z"), None),
            submission("s2", "q1", Some("2026-01-06T10:00:00Z"), None),
            submission("s3", "other", Some("2026-01-07T10:00:00Z"), None),
        ];
        let picked = select_submission(&subs, "q1", Strategy::Latest).unwrap();
        assert_eq!(picked.submission.submission_id, "s2");
        assert_eq!(picked.candidates, 2);
    }

    #[test]
    fn test_latest_tie_goes_to_later_candidate() {
        let subs = vec![
            submission("s1", "q1", Some("2026-01-05T10:00:00Z"), None),
            submission("s2", "q1", Some("2026-01-05T10:00:00Z"), None),
        ];
        let picked = select_submission(&subs, "q1", Strategy::Latest).unwrap();
        assert_eq!(picked.submission.submission_id, "s2");
    }

    #[test]
    fn test_latest_unparseable_dates_sort_as_epoch() {
        let subs = vec![
            submission("s1", "q1", Some("garbage"), None),
            submission("s2", "q1", Some("2026-01-05T10:00:00Z"), None),
            submission("s3", "q1", None, None),
        ];
        let picked = select_submission(&subs, "q1", Strategy::Latest).unwrap();
        assert_eq!(picked.submission.submission_id, "s2");
        assert_eq!(picked.candidates, 3);
    }

    #[test]
    fn test_best_requires_exactly_one_flag() {
        let none = vec![
            submission("s1", "q1", None, None),
            submission("s2", "q1", None, Some(false)),
        ];
        let err = select_submission(&none, "q1", Strategy::Best).unwrap_err();
        assert!(err.to_string().contains("no submission flagged best_submission"));
        assert!(err.to_string().contains("candidates=2"));

        let two = vec![
            submission("s1", "q1", None, Some(true)),
            submission("s2", "q1", None, Some(true)),
        ];
        let err = select_submission(&two, "q1", Strategy::Best).unwrap_err();
        assert!(err.to_string().contains("2 submissions flagged"));

        let one = vec![
            submission("s1", "q1", None, Some(true)),
            submission("s2", "q1", None, Some(false)),
        ];
        let picked = select_submission(&one, "q1", Strategy::Best).unwrap();
        assert_eq!(picked.submission.submission_id, "s1");
        assert_eq!(picked.candidates, 2);
    }
}
