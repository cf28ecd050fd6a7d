//! Instance cache.
//!
//! Maps a roster login id (`user_uin`) to its remote assessment instance
//! id, per assessment, scoped to one course instance. Mappings are only
//! ever replaced whole by an explicit refresh — a fetch reads but never
//! writes, and no partial merge exists.

use crate::error::ExportError;
use crate::traits::cache_store::CacheStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The cached mapping for one assessment, with the time it was loaded from
/// the remote platform (`None` until the first refresh).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceCacheEntry {
    pub map: HashMap<String, String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// In-memory view over the persisted per-(course, assessment) caches.
pub struct InstanceCache<S: CacheStore> {
    course_instance_id: String,
    by_assessment: HashMap<String, InstanceCacheEntry>,
    store: S,
}

impl<S: CacheStore> InstanceCache<S> {
    pub fn new(course_instance_id: impl Into<String>, store: S) -> Self {
        InstanceCache {
            course_instance_id: course_instance_id.into(),
            by_assessment: HashMap::new(),
            store,
        }
    }

    pub fn course_instance_id(&self) -> &str {
        &self.course_instance_id
    }

    /// The cache entry for an assessment. Blank ids (either the assessment
    /// or the course scope) and never-loaded assessments yield an empty
    /// entry. Store failures degrade to empty with a warning rather than
    /// failing a read.
    pub fn get(&mut self, assessment_id: &str) -> InstanceCacheEntry {
        let aid = assessment_id.trim();
        if aid.is_empty() || self.course_instance_id.trim().is_empty() {
            return InstanceCacheEntry::default();
        }

        if let Some(entry) = self.by_assessment.get(aid) {
            return entry.clone();
        }

        let entry = match self.store.load(&self.course_instance_id, aid) {
            Ok(Some(entry)) => entry,
            Ok(None) => InstanceCacheEntry::default(),
            Err(err) => {
                log::warn!("instance cache load failed for assessment_id={aid}: {err}");
                InstanceCacheEntry::default()
            }
        };
        self.by_assessment.insert(aid.to_string(), entry.clone());
        entry
    }

    /// Replace the whole mapping for an assessment, in memory and in the
    /// store. A blank assessment id is ignored.
    pub fn set(&mut self, assessment_id: &str, entry: InstanceCacheEntry) -> Result<(), ExportError> {
        let aid = assessment_id.trim();
        if aid.is_empty() {
            return Ok(());
        }
        self.store.save(&self.course_instance_id, aid, &entry)?;
        self.by_assessment.insert(aid.to_string(), entry);
        Ok(())
    }

    /// Drop everything: the in-memory view and every persisted entry.
    pub fn clear_all(&mut self) -> Result<(), ExportError> {
        self.by_assessment.clear();
        self.store.clear_all()
    }

    /// Re-scope to a different course instance. The in-memory view is
    /// invalidated; persisted entries for other courses stay untouched.
    pub fn set_course_instance_id(&mut self, course_instance_id: &str) {
        if self.course_instance_id != course_instance_id {
            self.course_instance_id = course_instance_id.to_string();
            self.by_assessment.clear();
        }
    }
}
