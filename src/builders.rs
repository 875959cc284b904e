//! Builder utilities shared by the resolution passes.
//!
//! Small value-object constructors: the implicit deploy-target builder
//! that splits an `"<org> <space>"` name pattern into its coordinates, and
//! generic `Resource`/target builders used wherever a pass synthesizes new
//! descriptor elements.

use serde_json::Value;

use crate::descriptor::{Properties, Resource};
use crate::error::{Error, Result};
use crate::platform::CloudTarget;

/// Split an implicit `"<org> <space>"` deploy-target name into a
/// `CloudTarget`.
pub fn target_from_space_name(name: &str) -> Result<CloudTarget> {
    let mut parts = name.splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some(org), Some(space)) if !org.is_empty() && !space.trim().is_empty() => {
            Ok(CloudTarget::new(org, space.trim()))
        }
        _ => Err(Error::MalformedTarget {
            name: name.to_string(),
        }),
    }
}

/// Incremental constructor for descriptor resources.
#[derive(Debug, Default)]
pub struct ResourceBuilder {
    name: String,
    r#type: Option<String>,
    properties: Properties,
    description: Option<String>,
    groups: Vec<String>,
}

impl ResourceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, r#type: impl Into<String>) -> Self {
        self.r#type = Some(r#type.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    pub fn build(self) -> Resource {
        Resource {
            name: self.name,
            r#type: self.r#type,
            properties: self.properties,
            description: self.description,
            groups: self.groups,
        }
    }
}

/// Incremental constructor for cloud targets.
#[derive(Debug, Default)]
pub struct TargetBuilder {
    org: String,
    space: String,
}

impl TargetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    pub fn space(mut self, space: impl Into<String>) -> Self {
        self.space = space.into();
        self
    }

    pub fn build(self) -> CloudTarget {
        CloudTarget::new(self.org, self.space)
    }
}
