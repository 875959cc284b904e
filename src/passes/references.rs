//! References resolution pass.
//!
//! Drives the traversal dispatcher over a descriptor's resources, parses
//! every reference resource into a configuration filter, resolves the
//! filter against the entry store, and splices the results back into the
//! descriptor's resource list in place of the originals.
//!
//! After the rewrite, every recorded resolution must have produced exactly
//! one resource: zero matches and multiple matches are both content errors
//! naming the original resource. The underlying resolver is capable of
//! producing an indexed candidate list for the multi-match case; this pass
//! still rejects it, and dependency names elsewhere in the descriptor are
//! never rewritten to resolved names.

use std::collections::HashMap;

use log::debug;

use crate::descriptor::{DeploymentDescriptor, Resource};
use crate::error::{Error, Result};
use crate::filter;
use crate::platform::CloudTarget;
use crate::reference::{ConfigurationReferenceResolver, ResolvedConfigurationReference};
use crate::store::ConfigurationEntryStore;
use crate::visitor::{self, DescriptorVisitor};

/// Collects one `ResolvedConfigurationReference` per reference resource,
/// in traversal order.
struct ReferenceCollector<'a> {
    resolver: ConfigurationReferenceResolver<'a>,
    current_target: &'a CloudTarget,
    resolved: Vec<ResolvedConfigurationReference>,
}

impl DescriptorVisitor for ReferenceCollector<'_> {
    fn on_resource(&mut self, descriptor: &DeploymentDescriptor, resource: &Resource) -> Result<()> {
        let chain = descriptor.resource_property_chain(resource);
        let Some(parsed) = filter::parse(resource, &chain, self.current_target)? else {
            return Ok(());
        };

        let explicit_target = ConfigurationReferenceResolver::explicit_target(&parsed)?;
        let resulting_resources = self.resolver.resolve(resource, &parsed, explicit_target)?;
        debug!(
            "recorded configuration reference '{}' with {} resulting resource(s)",
            resource.name,
            resulting_resources.len()
        );

        self.resolved.push(ResolvedConfigurationReference {
            filter: parsed,
            resource: resource.clone(),
            resulting_resources,
        });
        Ok(())
    }
}

/// Resolve every configuration reference in `descriptor` and splice the
/// results into the resource list, preserving relative order.
pub fn execute(
    descriptor: DeploymentDescriptor,
    store: &dyn ConfigurationEntryStore,
    current_target: &CloudTarget,
) -> Result<DeploymentDescriptor> {
    let mut collector = ReferenceCollector {
        resolver: ConfigurationReferenceResolver::new(store, current_target),
        current_target,
        resolved: Vec::new(),
    };
    visitor::walk(&descriptor, &mut collector)?;

    let mut descriptor = descriptor;
    let resolved = collector.resolved;
    let by_name: HashMap<&str, &ResolvedConfigurationReference> = resolved
        .iter()
        .map(|reference| (reference.resource.name.as_str(), reference))
        .collect();

    // Replace each reference resource by its candidate list in place;
    // untouched resources keep their position.
    let mut resources = Vec::with_capacity(descriptor.resources.len());
    for resource in descriptor.resources.drain(..) {
        match by_name.get(resource.name.as_str()) {
            Some(reference) => resources.extend(reference.resulting_resources.iter().cloned()),
            None => resources.push(resource),
        }
    }
    descriptor.resources = resources;

    // Exactly one resulting resource per reference, checked in the
    // original declaration order for deterministic error reporting.
    for reference in &resolved {
        match reference.resulting_resources.len() {
            1 => {}
            0 => {
                return Err(Error::NoConfigurationEntries {
                    resource: reference.resource.name.clone(),
                })
            }
            _ => {
                return Err(Error::MultipleConfigurationEntries {
                    resource: reference.resource.name.clone(),
                })
            }
        }
    }

    descriptor.ensure_unique_resource_names()?;
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor;
    use crate::platform::CloudTarget;
    use crate::store::{ConfigurationEntry, FileStore};

    fn current_target() -> CloudTarget {
        CloudTarget::new("o", "s")
    }

    fn entry(provider_id: &str, content: &str) -> ConfigurationEntry {
        ConfigurationEntry {
            provider_nid: "mta".to_string(),
            provider_id: provider_id.to_string(),
            provider_version: Some("1.0.0".to_string()),
            target: current_target(),
            content: content.to_string(),
            content_id: None,
        }
    }

    fn descriptor_with_reference() -> DeploymentDescriptor {
        descriptor::parse(
            r#"
id: shop
version: 1.0.0
modules:
  - name: web
    type: nodejs
    requires:
      - pricing-api
resources:
  - name: uaa
    type: org.cloudfoundry.managed-service
  - name: pricing-api
    type: configuration
    properties:
      provider-id: "pricing:api"
      plan: small
  - name: logs
    type: org.cloudfoundry.managed-service
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_single_match_replaces_resource_in_place() {
        let store = FileStore::with_entries(vec![entry(
            "pricing:api",
            r#"{"url":"https://pricing","plan":"large"}"#,
        )]);

        let resolved = execute(descriptor_with_reference(), &store, &current_target()).unwrap();

        let names: Vec<_> = resolved.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["uaa", "pricing-api", "logs"]);

        let pricing = resolved.resource("pricing-api").unwrap();
        assert!(pricing.r#type.is_none());
        assert_eq!(pricing.properties.get("url").unwrap(), "https://pricing");
        // Source non-reserved property wins over entry content.
        assert_eq!(pricing.properties.get("plan").unwrap(), "small");
    }

    #[test]
    fn test_zero_matches_is_a_content_error_naming_the_resource() {
        let store = FileStore::empty();
        let err = execute(descriptor_with_reference(), &store, &current_target()).unwrap_err();
        assert!(matches!(
            err,
            Error::NoConfigurationEntries { ref resource } if resource == "pricing-api"
        ));
    }

    #[test]
    fn test_two_matches_is_a_content_error_despite_indexed_candidates() {
        let store = FileStore::with_entries(vec![
            entry("pricing:api", r#"{"n":0}"#),
            entry("pricing:api", r#"{"n":1}"#),
        ]);
        let err = execute(descriptor_with_reference(), &store, &current_target()).unwrap_err();
        assert!(matches!(
            err,
            Error::MultipleConfigurationEntries { ref resource } if resource == "pricing-api"
        ));
    }

    #[test]
    fn test_descriptor_without_references_is_untouched() {
        let original = descriptor::parse(
            r#"
id: shop
version: 1.0.0
resources:
  - name: uaa
    type: org.cloudfoundry.managed-service
  - name: db
    type: hdi-container
"#,
        )
        .unwrap();

        let store = FileStore::empty();
        let resolved = execute(original.clone(), &store, &current_target()).unwrap();
        assert_eq!(resolved.resources.len(), 2);
        assert_eq!(
            resolved.resources[0].r#type,
            original.resources[0].r#type
        );
    }

    #[test]
    fn test_module_dependency_names_are_not_rewritten() {
        let store = FileStore::with_entries(vec![entry("pricing:api", "{}")]);
        let resolved = execute(descriptor_with_reference(), &store, &current_target()).unwrap();
        // The module still requires the original name; with a single match
        // the replacement kept that name, so the edge stays valid.
        assert_eq!(resolved.modules[0].requires, vec!["pricing-api"]);
    }

    #[test]
    fn test_legacy_reference_resolves_against_current_target() {
        let yaml = r#"
id: shop
version: 1.0.0
resources:
  - name: pricing
    type: mta-provides-dependency
    properties:
      mta-id: X
      mta-provides-dependency: dep
      mta-version: 1.0.0
"#;
        let descriptor = descriptor::parse(yaml).unwrap();
        let mut published = entry("X:dep", r#"{"url":"https://dep"}"#);
        published.provider_version = Some("1.0.0".to_string());
        let store = FileStore::with_entries(vec![published]);

        let resolved = execute(descriptor, &store, &current_target()).unwrap();
        let pricing = resolved.resource("pricing").unwrap();
        assert_eq!(pricing.properties.get("url").unwrap(), "https://dep");
    }

    #[test]
    fn test_resource_names_stay_unique_after_pass() {
        let store = FileStore::with_entries(vec![entry("pricing:api", "{}")]);
        let resolved = execute(descriptor_with_reference(), &store, &current_target()).unwrap();
        resolved.ensure_unique_resource_names().unwrap();
    }
}
