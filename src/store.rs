//! # Configuration-Entry Store
//!
//! A configuration entry is a resource published by one deployed MTA that
//! another MTA can reference and consume, identified by provider
//! namespace/id/version and the target it lives in. This module defines
//! the read-only view the pipeline has of such entries: the
//! `ConfigurationEntryStore` trait queried by the reference resolver, and
//! `FileStore`, a default implementation backed by a YAML file of entry
//! records.
//!
//! ## Design
//!
//! The store is a trait so that tests can substitute mock implementations
//! and a live deployment can back it with a platform API client; the
//! pipeline itself never writes entries. `FileStore` implements the
//! baseline matching semantics — equality on provider fields, candidate
//! targets with a global fallback, and a content sub-map filter — and
//! returns matches in the file's declaration order. Any ranking beyond
//! that is a concern of richer store implementations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::descriptor::Properties;
use crate::error::{Error, Result};
use crate::filter::ConfigurationFilter;
use crate::platform::CloudTarget;

/// One published configuration entry. Externally owned; the pipeline only
/// reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurationEntry {
    /// Provider namespace id (e.g. `mta` for entries published by MTAs).
    pub provider_nid: String,
    /// Provider id within the namespace.
    pub provider_id: String,
    /// Version the provider published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_version: Option<String>,
    /// Target the entry lives in.
    pub target: CloudTarget,
    /// Opaque JSON content.
    pub content: String,
    /// Store-assigned content id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

impl ConfigurationEntry {
    /// Decode the opaque JSON content into a property bag. Non-object
    /// content is wrapped under a single `content` key so that scalar
    /// payloads still merge into resource properties.
    pub fn decoded_content(&self) -> Result<Properties> {
        let value: Value = serde_json::from_str(&self.content)?;
        match value {
            Value::Object(map) => Ok(map),
            other => {
                let mut map = Properties::new();
                map.insert("content".to_string(), other);
                Ok(map)
            }
        }
    }
}

/// Query interface over published configuration entries.
pub trait ConfigurationEntryStore {
    /// Find all entries matching `filter` within `candidate_targets`,
    /// falling back to `fallback_target` when no candidates are given.
    /// The returned order is the store's own and is significant to the
    /// caller (it determines positional suffixes for multi-matches).
    fn find(
        &self,
        filter: &ConfigurationFilter,
        candidate_targets: &[CloudTarget],
        fallback_target: &CloudTarget,
    ) -> Result<Vec<ConfigurationEntry>>;
}

/// On-file entry record: `content` may be written as an inline YAML map
/// or as a pre-encoded JSON string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct EntryRecord {
    provider_nid: String,
    provider_id: String,
    #[serde(default)]
    provider_version: Option<String>,
    target: CloudTarget,
    content: Value,
    #[serde(default)]
    content_id: Option<String>,
}

impl EntryRecord {
    fn into_entry(self) -> Result<ConfigurationEntry> {
        let content = match self.content {
            Value::String(raw) => raw,
            other => serde_json::to_string(&other)?,
        };
        Ok(ConfigurationEntry {
            provider_nid: self.provider_nid,
            provider_id: self.provider_id,
            provider_version: self.provider_version,
            target: self.target,
            content,
            content_id: self.content_id,
        })
    }
}

/// A configuration-entry store backed by a YAML file of entry records.
#[derive(Debug, Default)]
pub struct FileStore {
    entries: Vec<ConfigurationEntry>,
}

impl FileStore {
    /// A store with no entries; every reference lookup yields no matches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ConfigurationEntry>) -> Self {
        Self { entries }
    }

    /// Parse a YAML list of entry records.
    pub fn parse(yaml: &str) -> Result<Self> {
        let records: Vec<EntryRecord> = serde_yaml::from_str(yaml)?;
        let entries = records
            .into_iter()
            .map(EntryRecord::into_entry)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Load entry records from a file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::Store {
            message: format!("Cannot read entries file {}: {}", path.display(), e),
        })?;
        Self::parse(&yaml)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matches(
        entry: &ConfigurationEntry,
        filter: &ConfigurationFilter,
        candidate_targets: &[CloudTarget],
        fallback_target: &CloudTarget,
    ) -> bool {
        if let Some(nid) = &filter.provider_nid {
            if &entry.provider_nid != nid {
                return false;
            }
        }
        if let Some(id) = &filter.provider_id {
            if &entry.provider_id != id {
                return false;
            }
        }
        if let Some(version) = &filter.version {
            if entry.provider_version.as_ref() != Some(version) {
                return false;
            }
        }

        let in_target = if candidate_targets.is_empty() {
            &entry.target == fallback_target
        } else {
            candidate_targets.contains(&entry.target)
        };
        if !in_target {
            return false;
        }

        if let Some(required) = &filter.content {
            let content = match entry.decoded_content() {
                Ok(content) => content,
                Err(_) => return false,
            };
            for (key, value) in required {
                if content.get(key) != Some(value) {
                    return false;
                }
            }
        }

        true
    }
}

impl ConfigurationEntryStore for FileStore {
    fn find(
        &self,
        filter: &ConfigurationFilter,
        candidate_targets: &[CloudTarget],
        fallback_target: &CloudTarget,
    ) -> Result<Vec<ConfigurationEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| Self::matches(entry, filter, candidate_targets, fallback_target))
            .cloned()
            .collect())
    }
}
