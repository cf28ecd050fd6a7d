//! # Exporter Library
//!
//! Core logic of plexport: resolving the student being graded to a remote
//! identity, picking exactly one of their PrairieLearn submissions for a
//! configured question, turning that submission into text via a pluggable
//! processor, and writing the result to an output destination under an
//! optional audit header.
//!
//! The crate is transport- and storage-agnostic: the remote platform is a
//! [`traits::SubmissionApi`], the output destination a
//! [`traits::OutputSink`], and cache persistence a [`traits::CacheStore`].
//! The `pl_api` and `cli` crates supply the concrete collaborators.
//!
//! # Pipeline
//!
//! [`pipeline::FetchPipeline::fetch`] runs the stages strictly in order —
//! identity, configuration, destination, cache lookup, remote fetch,
//! selection, processing, header, write — and stops at the first failure
//! with a single [`error::ExportError`]. No partial output is ever written.

pub mod cache;
pub mod error;
pub mod header;
pub mod identity;
pub mod pipeline;
pub mod processors;
pub mod selector;
pub mod traits;
pub mod types;

pub use cache::{InstanceCache, InstanceCacheEntry};
pub use error::ExportError;
pub use header::{HeaderMode, build_header_block};
pub use identity::{Resolution, resolve_identity};
pub use pipeline::{FetchPipeline, FetchReport, FetchRequest, RemoteSettings, refresh_instances};
pub use processors::ProcessorRegistry;
pub use selector::{SelectedSubmission, select_submission};
pub use types::{
    AssessmentInstance, ExportRule, ProcessorConfig, ProcessorOutput, Strategy, Submission,
};
