pub mod cache_store;
pub mod output_sink;
pub mod processor;
pub mod submission_api;

pub use cache_store::CacheStore;
pub use output_sink::OutputSink;
pub use processor::Processor;
pub use submission_api::SubmissionApi;
