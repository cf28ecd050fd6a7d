//! Exporter error taxonomy.
//!
//! Every fetch-pipeline stage fails with exactly one [`ExportError`]; the
//! first failure is terminal for that invocation and is surfaced to the user
//! as a single status line. Row-scoped roster import problems are *not*
//! errors of this kind — they stay `Vec<String>` and never abort an import.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Required settings are missing (base URL, API token, course scope,
    /// assessment id). Carries the aggregated messages.
    #[error("configuration incomplete: {0}")]
    Config(String),

    /// The displayed student could not be resolved against the roster.
    #[error("identity unresolved: {0}")]
    Identity(String),

    /// The resolved identity has no cached assessment instance. This is a
    /// data-availability condition; it never triggers an implicit refresh.
    #[error("no instance for user_uin={user_uin} (assessment_id={assessment_id})")]
    CacheMiss {
        user_uin: String,
        assessment_id: String,
    },

    /// No candidate, or an ambiguous set of candidates, for the question.
    #[error("{0}")]
    Selection(String),

    /// The configured processor rejected the submission payload.
    #[error("{0}")]
    Processor(String),

    /// Network failure, non-2xx response, or undecodable remote payload.
    #[error("remote request failed: {0}")]
    Transport(String),

    /// No output destination, or the destination could not be written.
    #[error("{0}")]
    Output(String),

    /// The persisted state surface (roster/rules/cache files) misbehaved.
    #[error("state storage failed: {0}")]
    Storage(String),

    /// A roster import produced no usable entries. Row-scoped problems are
    /// reported individually and do not raise this; only a wholly unusable
    /// import does.
    #[error("roster import failed: {0}")]
    Import(String),
}
