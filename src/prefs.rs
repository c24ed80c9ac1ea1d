use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sorter::SortKey;

/// Persisted sort choice for one view, stored as `{"sorter": <index>, "ascending": <bool>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPreference {
    pub sorter: SortKey,
    pub ascending: bool,
}

impl Default for SortPreference {
    fn default() -> Self {
        Self {
            sorter: SortKey::Name,
            ascending: true,
        }
    }
}

/// Key-value storage for sort preferences, keyed by view context.
pub trait PreferenceStore {
    /// Stored preference for `key`, or the default when absent or unreadable.
    fn get(&self, key: &str) -> SortPreference;

    fn set(&mut self, key: &str, preference: SortPreference) -> Result<()>;
}

/// Select `target` as the active sorter for `key`.
///
/// Re-selecting the target that is currently sorted ascending switches it to
/// descending; every other selection sorts ascending.
pub fn toggle(
    store: &mut dyn PreferenceStore,
    key: &str,
    target: SortKey,
) -> Result<SortPreference> {
    let previous = store.get(key);
    let was_ascending = previous.sorter == target && previous.ascending;
    let next = SortPreference {
        sorter: target,
        ascending: !was_ascending,
    };
    store.set(key, next)?;
    tracing::debug!(key, sorter = %target, ascending = next.ascending, "sort preference saved");
    Ok(next)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, SortPreference>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> SortPreference {
        self.entries.get(key).copied().unwrap_or_default()
    }

    fn set(&mut self, key: &str, preference: SortPreference) -> Result<()> {
        self.entries.insert(key.to_string(), preference);
        Ok(())
    }
}

/// Preferences kept in a single JSON object on disk, one entry per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read {}", self.path.display()));
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let mut file = tempfile::Builder::new()
            .prefix(".settings-")
            .suffix(".json")
            .tempfile_in(dir)
            .context("failed to create temp settings file")?;
        serde_json::to_writer_pretty(&mut file, entries)?;
        file.write_all(b"\n")?;
        file.persist(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> SortPreference {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("ignoring sort preferences: {:#}", e);
                return SortPreference::default();
            }
        };
        let Some(value) = entries.get(key) else {
            return SortPreference::default();
        };
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            tracing::warn!(key, "invalid stored sort preference: {}", e);
            SortPreference::default()
        })
    }

    fn set(&mut self, key: &str, preference: SortPreference) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            tracing::warn!("replacing unreadable sort preferences: {:#}", e);
            BTreeMap::new()
        });
        entries.insert(key.to_string(), serde_json::to_value(preference)?);
        self.write_entries(&entries)
    }
}
