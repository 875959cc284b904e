//! # Platform Model and Deployment-State Collaborators
//!
//! This module provides the value objects describing *where* a descriptor
//! is deployed — `CloudTarget` and `Platform` — together with the two
//! collaborator traits the passes consume: `ResourceTypeResolver`, which
//! maps a well-known resource-type marker to the platform's concrete type
//! tag, and `DeployedColorDetector`, which reports which blue/green color
//! of an MTA is already live.
//!
//! ## Design
//!
//! Both collaborators are traits so that tests can substitute mock
//! implementations, mirroring the trait-based separation used for the
//! configuration-entry store. The default implementations are a
//! table-driven `Platform` (loadable from a YAML file) and a
//! `StaticColorHistory` fed from CLI flags; a live deployment would back
//! them with platform API clients instead.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::descriptor::{ApplicationColor, Properties};
use crate::error::{Error, Result};
use crate::keys;

/// An (organization, space) coordinate identifying where a resource or
/// configuration entry lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CloudTarget {
    pub org: String,
    pub space: String,
}

impl CloudTarget {
    pub fn new(org: impl Into<String>, space: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            space: space.into(),
        }
    }

    /// The `"<org> <space>"` string form used in filters and entry
    /// records.
    pub fn space_name(&self) -> String {
        format!("{} {}", self.org, self.space)
    }
}

impl std::fmt::Display for CloudTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.org, self.space)
    }
}

/// A resource-type declaration of a deploy target: maps a well-known
/// marker (e.g. `user-provided-service`) to the platform's concrete
/// resource type tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceTypeDeclaration {
    /// The marker name the descriptor-level passes look up.
    pub name: String,
    /// The platform's concrete resource type tag.
    #[serde(rename = "service-type")]
    pub service_type: String,
    /// Additional declaration properties.
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

/// A deploy target platform: a name plus its resource-type table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    #[serde(rename = "resource-types", default)]
    pub resource_types: Vec<ResourceTypeDeclaration>,
}

impl Platform {
    /// The built-in platform table used when no platform file is given.
    /// Declares the user-provided-service type every target supports.
    pub fn built_in() -> Self {
        Self {
            name: "default".to_string(),
            resource_types: vec![ResourceTypeDeclaration {
                name: keys::USER_PROVIDED_SERVICE_MARKER.to_string(),
                service_type: "org.cloudfoundry.user-provided-service".to_string(),
                properties: Properties::new(),
            }],
        }
    }

    /// Parse a platform table from YAML.
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a platform table from a file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::parse(&yaml)
    }
}

/// Maps a well-known resource-type marker to the platform's concrete
/// resource type tag. Allows mocking in tests.
pub trait ResourceTypeResolver {
    /// Resolve the concrete type tag for `marker`, failing when the
    /// platform declares no such type.
    fn type_name_for(&self, marker: &str) -> Result<String>;
}

impl ResourceTypeResolver for Platform {
    fn type_name_for(&self, marker: &str) -> Result<String> {
        self.resource_types
            .iter()
            .find(|declaration| declaration.name == marker)
            .map(|declaration| declaration.service_type.clone())
            .ok_or_else(|| Error::UnknownResourceType {
                marker: marker.to_string(),
            })
    }
}

/// Reports which color of an MTA's blue/green pair is already deployed.
/// Allows mocking in tests.
pub trait DeployedColorDetector {
    /// The live color of `mta_id`, or `None` on a first-time deployment.
    fn deployed_color(&self, mta_id: &str) -> Result<Option<ApplicationColor>>;
}

/// A color history with a fixed answer, fed from CLI flags or tests. A
/// live deployment would query the platform for the running applications
/// instead.
#[derive(Debug, Clone, Default)]
pub struct StaticColorHistory {
    deployed: Option<ApplicationColor>,
}

impl StaticColorHistory {
    pub fn new(deployed: Option<ApplicationColor>) -> Self {
        Self { deployed }
    }
}

impl DeployedColorDetector for StaticColorHistory {
    fn deployed_color(&self, _mta_id: &str) -> Result<Option<ApplicationColor>> {
        Ok(self.deployed)
    }
}
