//! JSON-file state store.
//!
//! The persisted surface is three small JSON files under the configured
//! state directory: `roster.json` (the imported roster, replaced whole on
//! each import), `rules.json` (the export rules, edited by hand or by
//! tooling), and one file per (course, assessment) instance cache under
//! `instance_cache/`.

use exporter::cache::InstanceCacheEntry;
use exporter::error::ExportError;
use exporter::traits::CacheStore;
use exporter::types::ExportRule;
use roster::RosterEntry;
use std::fs;
use std::path::{Path, PathBuf};

const ROSTER_FILE: &str = "roster.json";
const RULES_FILE: &str = "rules.json";
const CACHE_DIR: &str = "instance_cache";

#[derive(Debug, Clone)]
pub struct JsonStateStore {
    root: PathBuf,
}

impl JsonStateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonStateStore { root: root.into() }
    }

    /// The stored roster; an absent file is an empty roster.
    pub fn load_roster(&self) -> Result<Vec<RosterEntry>, ExportError> {
        read_json_or_default(&self.root.join(ROSTER_FILE))
    }

    /// Replace the stored roster whole.
    pub fn save_roster(&self, entries: &[RosterEntry]) -> Result<(), ExportError> {
        write_json(&self.root.join(ROSTER_FILE), &entries)
    }

    /// The stored export rules; an absent file means no rules yet.
    pub fn load_rules(&self) -> Result<Vec<ExportRule>, ExportError> {
        read_json_or_default(&self.root.join(RULES_FILE))
    }

    fn cache_path(&self, course_instance_id: &str, assessment_id: &str) -> PathBuf {
        self.root.join(CACHE_DIR).join(format!(
            "{}__{}.json",
            sanitize(course_instance_id),
            sanitize(assessment_id)
        ))
    }
}

impl CacheStore for JsonStateStore {
    fn load(
        &self,
        course_instance_id: &str,
        assessment_id: &str,
    ) -> Result<Option<InstanceCacheEntry>, ExportError> {
        let path = self.cache_path(course_instance_id, assessment_id);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .map_err(|e| ExportError::Storage(format!("read {}: {e}", path.display())))?;
        let entry = serde_json::from_str(&data)
            .map_err(|e| ExportError::Storage(format!("parse {}: {e}", path.display())))?;
        Ok(Some(entry))
    }

    fn save(
        &self,
        course_instance_id: &str,
        assessment_id: &str,
        entry: &InstanceCacheEntry,
    ) -> Result<(), ExportError> {
        write_json(&self.cache_path(course_instance_id, assessment_id), entry)
    }

    fn clear_all(&self) -> Result<(), ExportError> {
        let dir = self.root.join(CACHE_DIR);
        if !dir.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&dir)
            .map_err(|e| ExportError::Storage(format!("clear {}: {e}", dir.display())))
    }
}

/// Keep file names safe regardless of what the ids contain.
fn sanitize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn read_json_or_default<T>(path: &Path) -> Result<T, ExportError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(path)
        .map_err(|e| ExportError::Storage(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&data)
        .map_err(|e| ExportError::Storage(format!("parse {}: {e}", path.display())))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ExportError::Storage(format!("create {}: {e}", parent.display())))?;
    }
    let data = serde_json::to_string_pretty(value)
        .map_err(|e| ExportError::Storage(format!("serialize {}: {e}", path.display())))?;
    fs::write(path, data)
        .map_err(|e| ExportError::Storage(format!("write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_roster_round_trip_and_full_replace() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path());
        assert!(store.load_roster().unwrap().is_empty());

        let first = vec![RosterEntry {
            name: "Jane Doe".to_string(),
            canvas_id: "1001".to_string(),
            sis_user_id: "u200100".to_string(),
            sis_login_id: "jdoe".to_string(),
        }];
        store.save_roster(&first).unwrap();
        assert_eq!(store.load_roster().unwrap(), first);

        let second = vec![RosterEntry {
            name: "Alex Smith".to_string(),
            canvas_id: "1002".to_string(),
            sis_user_id: "u200101".to_string(),
            sis_login_id: "asmith".to_string(),
        }];
        store.save_roster(&second).unwrap();
        assert_eq!(store.load_roster().unwrap(), second);
    }

    #[test]
    fn test_cache_store_round_trip_per_scope() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path());

        let entry = InstanceCacheEntry {
            map: HashMap::from([("jdoe".to_string(), "ai-7".to_string())]),
            loaded_at: None,
        };
        store.save("course1", "a1", &entry).unwrap();

        assert_eq!(store.load("course1", "a1").unwrap(), Some(entry));
        assert_eq!(store.load("course2", "a1").unwrap(), None);

        store.clear_all().unwrap();
        assert_eq!(store.load("course1", "a1").unwrap(), None);
    }

    #[test]
    fn test_sanitize_keeps_ids_filename_safe() {
        assert_eq!(sanitize("course/1 x"), "course_1_x");
        assert_eq!(sanitize(" a-1.b_c "), "a-1.b_c");
    }
}
