//! # Configuration Reference Resolution
//!
//! Executes a parsed [`ConfigurationFilter`] against the
//! configuration-entry store and materializes the matching entries into
//! candidate resources. The resolver produces a candidate per match —
//! name-suffixed by match position when more than one entry matches — and
//! leaves the exactly-one enforcement to the orchestrating pass.
//!
//! Candidate properties are the entry's decoded JSON content merged with
//! the source resource's own properties, with the reserved
//! reference-declaration parameters stripped first; surviving source
//! properties win on key collision. Candidates carry no type tag, so a
//! rewritten descriptor never re-resolves them.

use log::debug;

use crate::builders::{target_from_space_name, ResourceBuilder};
use crate::descriptor::Resource;
use crate::error::Result;
use crate::filter::ConfigurationFilter;
use crate::keys;
use crate::platform::CloudTarget;
use crate::store::{ConfigurationEntry, ConfigurationEntryStore};

/// One resolved reference: the filter, its source resource, and the
/// candidate resources the store produced. Transient — owned by the
/// orchestrator for the duration of one pass and discarded once the
/// descriptor has been rewritten.
#[derive(Debug, Clone)]
pub struct ResolvedConfigurationReference {
    pub filter: ConfigurationFilter,
    pub resource: Resource,
    pub resulting_resources: Vec<Resource>,
}

/// Materializes configuration entries into candidate resources.
pub struct ConfigurationReferenceResolver<'a> {
    store: &'a dyn ConfigurationEntryStore,
    default_target: &'a CloudTarget,
}

impl<'a> ConfigurationReferenceResolver<'a> {
    pub fn new(store: &'a dyn ConfigurationEntryStore, default_target: &'a CloudTarget) -> Self {
        Self {
            store,
            default_target,
        }
    }

    /// The explicit target a filter carries, if any.
    pub fn explicit_target(filter: &ConfigurationFilter) -> Result<Option<CloudTarget>> {
        filter
            .target_space
            .as_deref()
            .map(target_from_space_name)
            .transpose()
    }

    /// Resolve `filter` for `resource`, returning the ordered candidate
    /// list — possibly empty, possibly more than one.
    pub fn resolve(
        &self,
        resource: &Resource,
        filter: &ConfigurationFilter,
        explicit_target: Option<CloudTarget>,
    ) -> Result<Vec<Resource>> {
        let candidate_targets: Vec<CloudTarget> = explicit_target.into_iter().collect();
        let entries = self
            .store
            .find(filter, &candidate_targets, self.default_target)?;
        debug!(
            "resource '{}': {} configuration entr{} matched",
            resource.name,
            entries.len(),
            if entries.len() == 1 { "y" } else { "ies" }
        );

        let total = entries.len();
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.as_resource(resource, entry, index, total))
            .collect()
    }

    fn as_resource(
        &self,
        source: &Resource,
        entry: &ConfigurationEntry,
        index: usize,
        total: usize,
    ) -> Result<Resource> {
        let name = if total == 1 {
            source.name.clone()
        } else {
            format!("{}.{}", source.name, index)
        };

        let mut properties = entry.decoded_content()?;
        for (key, value) in &source.properties {
            if keys::REFERENCE_PARAMETERS.contains(&key.as_str()) {
                continue;
            }
            properties.insert(key.clone(), value.clone());
        }

        Ok(ResourceBuilder::new(name)
            .with_properties(properties)
            .with_description(source.description.clone())
            .with_groups(source.groups.clone())
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Properties;
    use crate::error::Error;
    use serde_json::Value;

    struct StubStore {
        entries: Vec<ConfigurationEntry>,
        expected_candidates: Vec<CloudTarget>,
    }

    impl ConfigurationEntryStore for StubStore {
        fn find(
            &self,
            _filter: &ConfigurationFilter,
            candidate_targets: &[CloudTarget],
            _fallback_target: &CloudTarget,
        ) -> Result<Vec<ConfigurationEntry>> {
            assert_eq!(candidate_targets, self.expected_candidates.as_slice());
            Ok(self.entries.clone())
        }
    }

    struct FailingStore;

    impl ConfigurationEntryStore for FailingStore {
        fn find(
            &self,
            _filter: &ConfigurationFilter,
            _candidate_targets: &[CloudTarget],
            _fallback_target: &CloudTarget,
        ) -> Result<Vec<ConfigurationEntry>> {
            Err(Error::Store {
                message: "store unavailable".to_string(),
            })
        }
    }

    fn entry(content: &str) -> ConfigurationEntry {
        ConfigurationEntry {
            provider_nid: "mta".to_string(),
            provider_id: "X:dep".to_string(),
            provider_version: Some("1.0.0".to_string()),
            target: CloudTarget::new("o", "s"),
            content: content.to_string(),
            content_id: None,
        }
    }

    fn reference_resource() -> Resource {
        ResourceBuilder::new("pricing")
            .with_type(keys::RESOURCE_TYPE_CONFIGURATION)
            .with_property("provider-id", Value::String("X:dep".to_string()))
            .with_property("plan", Value::String("small".to_string()))
            .with_description(Some("pricing endpoint".to_string()))
            .build()
    }

    fn any_filter() -> ConfigurationFilter {
        ConfigurationFilter {
            provider_nid: None,
            provider_id: Some("X:dep".to_string()),
            version: None,
            target_space: None,
            content: None,
        }
    }

    #[test]
    fn test_single_match_keeps_name_and_merges_properties() {
        let default = CloudTarget::new("o", "s");
        let store = StubStore {
            entries: vec![entry(r#"{"url":"https://x","plan":"large"}"#)],
            expected_candidates: vec![],
        };
        let resolver = ConfigurationReferenceResolver::new(&store, &default);

        let resolved = resolver
            .resolve(&reference_resource(), &any_filter(), None)
            .unwrap();

        assert_eq!(resolved.len(), 1);
        let candidate = &resolved[0];
        assert_eq!(candidate.name, "pricing");
        assert!(candidate.r#type.is_none());
        // Entry content survives...
        assert_eq!(candidate.properties.get("url").unwrap(), "https://x");
        // ...source non-reserved properties win on collision...
        assert_eq!(candidate.properties.get("plan").unwrap(), "small");
        // ...and reserved reference parameters are stripped.
        assert!(!candidate.properties.contains_key("provider-id"));
        // Description carries over.
        assert_eq!(candidate.description.as_deref(), Some("pricing endpoint"));
    }

    #[test]
    fn test_multiple_matches_get_positional_suffixes() {
        let default = CloudTarget::new("o", "s");
        let store = StubStore {
            entries: vec![entry(r#"{"n":0}"#), entry(r#"{"n":1}"#), entry(r#"{"n":2}"#)],
            expected_candidates: vec![],
        };
        let resolver = ConfigurationReferenceResolver::new(&store, &default);

        let resolved = resolver
            .resolve(&reference_resource(), &any_filter(), None)
            .unwrap();

        let names: Vec<_> = resolved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pricing.0", "pricing.1", "pricing.2"]);
    }

    #[test]
    fn test_zero_matches_yield_empty_list() {
        let default = CloudTarget::new("o", "s");
        let store = StubStore {
            entries: vec![],
            expected_candidates: vec![],
        };
        let resolver = ConfigurationReferenceResolver::new(&store, &default);

        let resolved = resolver
            .resolve(&reference_resource(), &any_filter(), None)
            .unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_explicit_target_becomes_the_candidate() {
        let default = CloudTarget::new("o", "s");
        let other = CloudTarget::new("other-org", "other-space");
        let store = StubStore {
            entries: vec![entry("{}")],
            expected_candidates: vec![other.clone()],
        };
        let resolver = ConfigurationReferenceResolver::new(&store, &default);

        resolver
            .resolve(&reference_resource(), &any_filter(), Some(other))
            .unwrap();
    }

    #[test]
    fn test_explicit_target_parsed_from_filter() {
        let mut filter = any_filter();
        filter.target_space = Some("other-org other-space".to_string());
        let target = ConfigurationReferenceResolver::explicit_target(&filter)
            .unwrap()
            .unwrap();
        assert_eq!(target, CloudTarget::new("other-org", "other-space"));

        assert!(ConfigurationReferenceResolver::explicit_target(&any_filter())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_store_failure_propagates() {
        let default = CloudTarget::new("o", "s");
        let resolver = ConfigurationReferenceResolver::new(&FailingStore, &default);
        let err = resolver
            .resolve(&reference_resource(), &any_filter(), None)
            .unwrap_err();
        assert!(err.to_string().contains("store unavailable"));
    }

    #[test]
    fn test_legacy_reserved_parameters_also_stripped() {
        let default = CloudTarget::new("o", "s");
        let store = StubStore {
            entries: vec![entry(r#"{"url":"https://x"}"#)],
            expected_candidates: vec![],
        };
        let resolver = ConfigurationReferenceResolver::new(&store, &default);

        let mut properties = Properties::new();
        properties.insert("mta-id".to_string(), Value::String("X".to_string()));
        properties.insert("mta-version".to_string(), Value::String("1.0".to_string()));
        properties.insert("keep-me".to_string(), Value::String("yes".to_string()));
        let source = ResourceBuilder::new("legacy")
            .with_type(keys::RESOURCE_TYPE_PROVIDES_DEPENDENCY)
            .with_properties(properties)
            .build();

        let resolved = resolver.resolve(&source, &any_filter(), None).unwrap();
        let candidate = &resolved[0];
        assert!(!candidate.properties.contains_key("mta-id"));
        assert!(!candidate.properties.contains_key("mta-version"));
        assert_eq!(candidate.properties.get("keep-me").unwrap(), "yes");
    }
}
