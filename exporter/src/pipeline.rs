//! Fetch orchestration.
//!
//! One pipeline invocation walks a fixed sequence: resolve identity,
//! validate configuration, check the output destination, look up the
//! cached assessment instance, fetch submissions, select one, process it,
//! and write the result. The first failing stage is terminal and nothing
//! is written until every stage has succeeded. There are no retries.

use crate::cache::{InstanceCache, InstanceCacheEntry};
use crate::error::ExportError;
use crate::header::{HeaderContext, HeaderMode, build_header_block};
use crate::identity::{Resolution, resolve_identity};
use crate::processors::ProcessorRegistry;
use crate::selector::select_submission;
use crate::traits::{CacheStore, OutputSink, SubmissionApi};
use crate::types::ExportRule;
use chrono::Utc;
use roster::RosterEntry;

/// Remote/course settings a fetch needs; usually sourced from the
/// environment config. Presence is validated per-invocation, not at
/// construction, so the tool can start half-configured.
#[derive(Debug, Clone, Default)]
pub struct RemoteSettings {
    pub base_url: String,
    pub api_token: String,
    pub course_instance_id: String,
    pub header_mode: HeaderMode,
}

/// What to fetch: the roster to resolve against, the on-screen student,
/// and the rule describing the question/assessment/processor.
pub struct FetchRequest<'a> {
    pub roster: &'a [RosterEntry],
    pub canvas_user_id: &'a str,
    pub displayed_name: Option<&'a str>,
    pub rule: &'a ExportRule,
}

/// Summary of a completed fetch, for the status line.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub file_name: String,
    pub bytes_written: usize,
    pub candidates: usize,
}

pub struct FetchPipeline<S: CacheStore> {
    settings: RemoteSettings,
    api: Box<dyn SubmissionApi>,
    sink: Option<Box<dyn OutputSink>>,
    registry: ProcessorRegistry,
    cache: InstanceCache<S>,
}

impl<S: CacheStore> FetchPipeline<S> {
    pub fn new(
        settings: RemoteSettings,
        api: Box<dyn SubmissionApi>,
        sink: Option<Box<dyn OutputSink>>,
        cache: InstanceCache<S>,
    ) -> Self {
        FetchPipeline {
            settings,
            api,
            sink,
            registry: ProcessorRegistry::with_builtins(),
            cache,
        }
    }

    pub fn registry_mut(&mut self) -> &mut ProcessorRegistry {
        &mut self.registry
    }

    pub fn cache_mut(&mut self) -> &mut InstanceCache<S> {
        &mut self.cache
    }

    /// Run one fetch end to end. Concurrent invocations are not serialized
    /// against each other; a fetch only reads the cache, so the worst case
    /// of an overlapping refresh is acting on the older full mapping.
    pub async fn fetch(&mut self, request: &FetchRequest<'_>) -> Result<FetchReport, ExportError> {
        let rule = request.rule;

        // 1. Identity.
        let (entry, user_uin) = match resolve_identity(
            request.roster,
            request.canvas_user_id,
            request.displayed_name,
        ) {
            Resolution::Resolved { entry, user_uin } => (entry, user_uin),
            Resolution::Unresolved { reasons, .. } => {
                return Err(ExportError::Identity(reasons.join("; ")));
            }
        };

        // 2. Configuration.
        let config_errors = config_errors_for_assessment(&self.settings, &rule.assessment_id);
        if !config_errors.is_empty() {
            return Err(ExportError::Config(config_errors.join("; ")));
        }

        // 3. Output destination.
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| ExportError::Output("No output file selected".to_string()))?;

        // 4. Cached instance id. A miss is a data-availability error and
        // never triggers an implicit remote refresh.
        let cached = self.cache.get(&rule.assessment_id);
        let assessment_instance_id = cached.map.get(&user_uin).cloned().ok_or_else(|| {
            ExportError::CacheMiss {
                user_uin: user_uin.clone(),
                assessment_id: rule.assessment_id.clone(),
            }
        })?;

        // 5. Remote submissions.
        log::info!(
            "fetching submissions for user_uin={user_uin} assessment_instance_id={assessment_instance_id}"
        );
        let submissions = self
            .api
            .list_submissions(&self.settings.course_instance_id, &assessment_instance_id)
            .await?;

        // 6. Selection.
        let selected = select_submission(&submissions, &rule.question_id, rule.strategy)?;

        // 7. Processing.
        let output = self.registry.run(&selected.submission, &rule.processor)?;

        // 8. Header.
        let header = build_header_block(
            self.settings.header_mode,
            &HeaderContext {
                entry: &entry,
                assessment_id: &rule.assessment_id,
                assessment_instance_id: &assessment_instance_id,
                question_id: &rule.question_id,
                selected: &selected,
                output: &output,
            },
        );

        // 9. Single write, only now that everything has succeeded.
        let text = format!("{header}{}\n", output.text);
        sink.write_text(&text).await?;
        log::info!("wrote {} ({} bytes) to {}", output.file_name, text.len(), sink.describe());

        Ok(FetchReport {
            file_name: output.file_name,
            bytes_written: text.len(),
            candidates: selected.candidates,
        })
    }
}

/// Rebuild the instance cache for one assessment from the remote platform:
/// a full replacement of the `user_uin -> assessment_instance_id` mapping,
/// stamped with the load time. Returns the mapping size.
pub async fn refresh_instances<S: CacheStore>(
    api: &dyn SubmissionApi,
    cache: &mut InstanceCache<S>,
    settings: &RemoteSettings,
    assessment_id: &str,
) -> Result<usize, ExportError> {
    let aid = assessment_id.trim();
    let config_errors = config_errors_for_assessment(settings, aid);
    if !config_errors.is_empty() {
        return Err(ExportError::Config(config_errors.join("; ")));
    }

    let instances = api
        .list_assessment_instances(&settings.course_instance_id, aid)
        .await?;

    let map = instances
        .into_iter()
        .filter_map(|instance| {
            let uin = instance.user_uin.trim().to_string();
            let ai = instance.assessment_instance_id.trim().to_string();
            (!uin.is_empty() && !ai.is_empty()).then_some((uin, ai))
        })
        .collect::<std::collections::HashMap<_, _>>();

    let size = map.len();
    cache.set(
        aid,
        InstanceCacheEntry {
            map,
            loaded_at: Some(Utc::now()),
        },
    )?;
    log::info!("loaded {size} instances (assessment_id={aid})");
    Ok(size)
}

/// Aggregated presence checks for the settings a remote call needs.
fn config_errors_for_assessment(settings: &RemoteSettings, assessment_id: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if settings.base_url.trim().is_empty() {
        errors.push("PrairieLearn Base URL is not set".to_string());
    }
    if settings.api_token.trim().is_empty() {
        errors.push("PrairieLearn API token is not set".to_string());
    }
    if settings.course_instance_id.trim().is_empty() {
        errors.push("Course Instance ID is not set".to_string());
    }
    if assessment_id.trim().is_empty() {
        errors.push("Assessment ID is not set for this rule".to_string());
    }
    errors
}
