//! # Deployment Descriptor Schema and Parsing
//!
//! This module defines the data structures that represent a deployment
//! descriptor (`mtad.yaml`), as well as the logic for parsing it. The
//! descriptor is the in-memory model of one MTA's modules, resources, and
//! properties for one deployment operation.
//!
//! ## Key Components
//!
//! - **`DeploymentDescriptor`**: the mutable tree owned by the caller for
//!   one resolution pass sequence. Holds an ordered list of modules, an
//!   ordered list of resources, and a global property bag. Declaration
//!   order is significant and is preserved by every rewrite.
//!
//! - **`Module`** / **`Resource`**: a deployable unit and a declared
//!   dependency. Resource names must be unique within a descriptor after
//!   every pass; `ensure_unique_resource_names` enforces this.
//!
//! - **`ModuleKind`** / **`ResourceKind`**: the well-known type tags from
//!   [`crate::keys`] classified once at this boundary. The passes match on
//!   these enums instead of comparing strings ad hoc.
//!
//! ## Parsing
//!
//! `parse` is the main entry point for parsing a YAML string into a
//! `DeploymentDescriptor`. Beyond serde deserialization it rejects empty
//! MTA ids and duplicate resource names, so every descriptor entering the
//! pipeline already satisfies the uniqueness invariant.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{Error, Result};
use crate::keys;

/// A property bag attached to the descriptor, a module, or a resource.
///
/// Backed by `serde_json::Map`, so key iteration is deterministic and the
/// values cover the full YAML/JSON scalar and composite range.
pub type Properties = serde_json::Map<String, Value>;

/// Descriptor schema versions this pipeline understands.
pub const SUPPORTED_SCHEMA_MAJOR: &str = "3";

fn default_schema_version() -> String {
    "3.1".to_string()
}

/// The color of one half of a blue/green application pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationColor {
    Blue,
    Green,
}

impl ApplicationColor {
    /// Name suffix appended to application and access-container names.
    pub fn as_suffix(self) -> &'static str {
        match self {
            ApplicationColor::Blue => "-blue",
            ApplicationColor::Green => "-green",
        }
    }
}

impl std::fmt::Display for ApplicationColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationColor::Blue => write!(f, "blue"),
            ApplicationColor::Green => write!(f, "green"),
        }
    }
}

impl std::str::FromStr for ApplicationColor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(ApplicationColor::Blue),
            "green" => Ok(ApplicationColor::Green),
            other => Err(format!("Unknown application color '{}'. Use: blue or green", other)),
        }
    }
}

/// Classification of a module's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// Generic database-container deployer (`hdi`).
    ContainerDeployer,
    /// Container deployer retyped for zero-downtime redeployment
    /// (`hdi-zdm`).
    ZeroDowntimeDeployer,
    /// Any other module type (applications, workers, ...).
    Other,
}

impl ModuleKind {
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            keys::MODULE_TYPE_HDI => ModuleKind::ContainerDeployer,
            keys::MODULE_TYPE_HDI_ZDM => ModuleKind::ZeroDowntimeDeployer,
            _ => ModuleKind::Other,
        }
    }
}

/// Classification of a resource's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Legacy provided-dependency reference (`mta-provides-dependency`).
    ProvidesDependencyReference,
    /// Configuration reference (`configuration`).
    ConfigurationReference,
    /// Database container (`hdi-container`).
    Container,
    /// Any other resource type, or no type at all.
    Other,
}

impl ResourceKind {
    pub fn from_type_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(keys::RESOURCE_TYPE_PROVIDES_DEPENDENCY) => {
                ResourceKind::ProvidesDependencyReference
            }
            Some(keys::RESOURCE_TYPE_CONFIGURATION) => ResourceKind::ConfigurationReference,
            Some(keys::RESOURCE_TYPE_CONTAINER) => ResourceKind::Container,
            _ => ResourceKind::Other,
        }
    }
}

/// A deployable unit within a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Module name, unique within the descriptor.
    pub name: String,
    /// Module type tag (e.g. `hdi`, `hdi-zdm`, or an application type).
    pub r#type: String,
    /// Names of required dependencies, in declaration order. Each name
    /// references a resource or another module.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// Module property bag.
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl Module {
    pub fn kind(&self) -> ModuleKind {
        ModuleKind::from_type_tag(&self.r#type)
    }

    /// The application name this module deploys as: the `app-name`
    /// property when set, the module name otherwise.
    pub fn app_name(&self) -> &str {
        self.properties
            .get(keys::PROP_APP_NAME)
            .and_then(Value::as_str)
            .unwrap_or(&self.name)
    }
}

/// A declared dependency (service, container, reference, ...) within a
/// descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Resource name, unique within the descriptor.
    pub name: String,
    /// Resource type tag. Resources synthesized by reference resolution
    /// carry no tag, so a repeated parse does not classify them as
    /// references again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    /// Resource property bag.
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    /// Free-text description, carried through every rewrite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Group tags, carried through every rewrite.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::from_type_tag(self.r#type.as_deref())
    }
}

/// A module's required dependency, classified against the descriptor.
#[derive(Debug, Clone, Copy)]
pub enum Dependency<'a> {
    Resource(&'a Resource),
    Module(&'a Module),
}

/// The in-memory model of one MTA deployment descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
    /// Descriptor schema version.
    #[serde(rename = "schema-version", default = "default_schema_version")]
    pub schema_version: String,
    /// MTA id.
    pub id: String,
    /// MTA version.
    pub version: String,
    /// Global property bag, inherited by every module and resource chain.
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    /// Modules in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<Module>,
    /// Resources in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl DeploymentDescriptor {
    /// Whether this descriptor's schema version is supported by the
    /// resolution passes.
    pub fn has_supported_schema_version(&self) -> bool {
        self.schema_version
            .split('.')
            .next()
            .is_some_and(|major| major == SUPPORTED_SCHEMA_MAJOR)
    }

    /// Find a resource by name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Find a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Classify a module's required dependency name against the
    /// descriptor. A name matching neither a resource nor a module is a
    /// resource-not-found error carrying both names for user display.
    pub fn dependency<'a>(&'a self, module: &Module, name: &str) -> Result<Dependency<'a>> {
        if let Some(resource) = self.resource(name) {
            return Ok(Dependency::Resource(resource));
        }
        if let Some(dependent) = self.module(name) {
            return Ok(Dependency::Module(dependent));
        }
        Err(Error::DependencyNotFound {
            module: module.name.clone(),
            dependency: name.to_string(),
        })
    }

    /// The merged property chain of a resource: global descriptor
    /// properties overridden by the resource's own.
    pub fn resource_property_chain(&self, resource: &Resource) -> Properties {
        merge_chain(&self.properties, &resource.properties)
    }

    /// The merged property chain of a module: global descriptor properties
    /// overridden by the module's own.
    pub fn module_property_chain(&self, module: &Module) -> Properties {
        merge_chain(&self.properties, &module.properties)
    }

    /// Enforce the resource-name uniqueness invariant. Every pass calls
    /// this before returning a rewritten descriptor.
    pub fn ensure_unique_resource_names(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for resource in &self.resources {
            if !seen.insert(resource.name.as_str()) {
                return Err(Error::DuplicateResourceName {
                    name: resource.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Check that every module's required dependency names exist in the
    /// descriptor, returning the first miss.
    pub fn validate_dependencies(&self) -> Result<()> {
        for module in &self.modules {
            for name in &module.requires {
                self.dependency(module, name)?;
            }
        }
        Ok(())
    }

    /// Serialize the descriptor back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn merge_chain(base: &Properties, own: &Properties) -> Properties {
    let mut merged = base.clone();
    for (key, value) in own {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Read a boolean-valued property, treating anything but `true` as false.
pub fn bool_property(properties: &Properties, key: &str) -> bool {
    properties.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Read a string-valued property.
pub fn str_property<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    properties.get(key).and_then(Value::as_str)
}

/// Parse a YAML string into a `DeploymentDescriptor`.
///
/// Rejects descriptors with an empty MTA id or duplicate resource names so
/// that every descriptor handed to the pipeline already satisfies the
/// uniqueness invariant.
pub fn parse(yaml: &str) -> Result<DeploymentDescriptor> {
    let descriptor: DeploymentDescriptor =
        serde_yaml::from_str(yaml).map_err(|e| Error::DescriptorParse {
            message: e.to_string(),
            hint: None,
        })?;

    if descriptor.id.trim().is_empty() {
        return Err(Error::DescriptorParse {
            message: "Descriptor has an empty MTA id".to_string(),
            hint: Some("Set 'id:' to the MTA's identifier".to_string()),
        });
    }

    descriptor.ensure_unique_resource_names()?;

    Ok(descriptor)
}

/// Parse a descriptor from a file on disk.
pub fn from_file(path: &Path) -> Result<DeploymentDescriptor> {
    let yaml = std::fs::read_to_string(path)?;
    parse(&yaml)
}
