//! # Configuration Filter Parsing
//!
//! Parses a resource's merged property chain into a normalized
//! [`ConfigurationFilter`] — the lookup criteria the reference resolver
//! runs against the configuration-entry store. Two mutually exclusive
//! declaration syntaxes are recognized, selected by the resource's type
//! tag:
//!
//! - **Legacy form** (`mta-provides-dependency`): mandatory `mta-id`,
//!   `mta-provides-dependency` and `mta-version` parameters. The provider
//!   id is derived from `(mta-id, mta-provides-dependency)` and the target
//!   space is computed from the *current* deployment target, never from
//!   the resource itself.
//!
//! - **Current form** (`configuration`): optional `version`,
//!   `provider-nid`, `provider-id`, an optional `target: {org, space}`
//!   override, and an optional generic `filter` key/value map.
//!
//! A resource whose type matches neither form is not a reference and
//! yields no filter. Parsing is a pure function of the property chain and
//! the supplied current target; resources are never mutated.

use serde_json::Value;

use crate::descriptor::{str_property, Properties, Resource, ResourceKind};
use crate::error::{Error, Result};
use crate::keys;
use crate::platform::CloudTarget;

/// Normalized configuration-entry lookup criteria. Produced once per
/// resource; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationFilter {
    /// Provider namespace id.
    pub provider_nid: Option<String>,
    /// Provider id within the namespace.
    pub provider_id: Option<String>,
    /// Provider version to match.
    pub version: Option<String>,
    /// `"<org> <space>"` target the entry must live in; the resolver falls
    /// back to the global default target when absent.
    pub target_space: Option<String>,
    /// Generic key/value criteria matched against entry content.
    pub content: Option<Properties>,
}

/// Derive the provider id a deployed MTA publishes a dependency under.
pub fn provider_id(mta_id: &str, provided_dependency: &str) -> String {
    format!("{}:{}", mta_id, provided_dependency)
}

/// Parse a resource's merged property chain into a filter.
///
/// `chain` is the resource's merged (inherited/overridden) property chain
/// as built by the descriptor; `current_target` is the org/space the
/// running deployment operation targets. Returns `None` for resources
/// that are not configuration references.
pub fn parse(
    resource: &Resource,
    chain: &Properties,
    current_target: &CloudTarget,
) -> Result<Option<ConfigurationFilter>> {
    match resource.kind() {
        ResourceKind::ProvidesDependencyReference => {
            parse_legacy(resource, chain, current_target).map(Some)
        }
        ResourceKind::ConfigurationReference => parse_current(resource, chain).map(Some),
        _ => Ok(None),
    }
}

fn required_param<'a>(resource: &Resource, chain: &'a Properties, key: &str) -> Result<&'a str> {
    str_property(chain, key).ok_or_else(|| Error::MissingReferenceParameter {
        resource: resource.name.clone(),
        parameter: key.to_string(),
    })
}

fn parse_legacy(
    resource: &Resource,
    chain: &Properties,
    current_target: &CloudTarget,
) -> Result<ConfigurationFilter> {
    let mta_id = required_param(resource, chain, keys::PARAM_MTA_ID)?;
    let provided = required_param(resource, chain, keys::PARAM_MTA_PROVIDES_DEPENDENCY)?;
    let version = required_param(resource, chain, keys::PARAM_MTA_VERSION)?;

    Ok(ConfigurationFilter {
        provider_nid: Some(keys::PROVIDER_NID_MTA.to_string()),
        provider_id: Some(provider_id(mta_id, provided)),
        version: Some(version.to_string()),
        target_space: Some(current_target.space_name()),
        content: None,
    })
}

fn parse_current(resource: &Resource, chain: &Properties) -> Result<ConfigurationFilter> {
    let target_space = match chain.get(keys::PARAM_TARGET) {
        None => None,
        Some(value) => Some(parse_target_override(resource, value)?),
    };

    let content = match chain.get(keys::PARAM_FILTER) {
        None => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => {
            return Err(Error::DescriptorParse {
                message: format!(
                    "Resource \"{}\" has a non-map \"{}\" parameter",
                    resource.name,
                    keys::PARAM_FILTER
                ),
                hint: Some("Declare filter as a key/value map".to_string()),
            })
        }
    };

    Ok(ConfigurationFilter {
        provider_nid: str_property(chain, keys::PARAM_PROVIDER_NID).map(str::to_string),
        provider_id: str_property(chain, keys::PARAM_PROVIDER_ID).map(str::to_string),
        version: str_property(chain, keys::PARAM_VERSION).map(str::to_string),
        target_space,
        content,
    })
}

fn parse_target_override(resource: &Resource, value: &Value) -> Result<String> {
    let malformed = || Error::DescriptorParse {
        message: format!(
            "Resource \"{}\" has a malformed \"{}\" parameter",
            resource.name,
            keys::PARAM_TARGET
        ),
        hint: Some("Declare target as a map with org and space".to_string()),
    };

    let map = value.as_object().ok_or_else(malformed)?;
    let org = map
        .get(keys::PARAM_TARGET_ORG)
        .and_then(Value::as_str)
        .ok_or_else(malformed)?;
    let space = map
        .get(keys::PARAM_TARGET_SPACE)
        .and_then(Value::as_str)
        .ok_or_else(malformed)?;
    Ok(CloudTarget::new(org, space).space_name())
}
