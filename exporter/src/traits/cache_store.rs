use crate::cache::InstanceCacheEntry;
use crate::error::ExportError;

/// Durable backing for the per-(course, assessment) instance cache.
///
/// Entries are always saved and loaded whole; there is no partial update of
/// a persisted mapping.
pub trait CacheStore: Send + Sync {
    fn load(
        &self,
        course_instance_id: &str,
        assessment_id: &str,
    ) -> Result<Option<InstanceCacheEntry>, ExportError>;

    fn save(
        &self,
        course_instance_id: &str,
        assessment_id: &str,
        entry: &InstanceCacheEntry,
    ) -> Result<(), ExportError>;

    /// Remove every persisted entry, across all scopes.
    fn clear_all(&self) -> Result<(), ExportError>;
}
