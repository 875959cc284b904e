//! Implementation of the descriptor resolution passes.
//!
//! ## Overview
//!
//! One deployment operation owns one `DeploymentDescriptor` and runs the
//! passes over it in a fixed order:
//!
//! 1. User-provided resolution - Synthesize requested user-provided
//!    services and wire their modules to them
//! 2. References resolution - Resolve configuration references against
//!    the entry store and splice the results into the resource list
//! 3. Blue/green appending - Duplicate zero-downtime containers and color
//!    the application names (only when a deployment color is set)
//!
//! Each pass consumes the descriptor and returns a rewritten one; scratch
//! state (resolved references, the container-role map) stays local to the
//! pass that computed it. The resolved descriptor is what the downstream
//! cloud-model builder consumes.
//!
//! [`DescriptorResolver`] holds the pass set and collaborator handles for
//! one operation. It is built explicitly per deployment — there is no
//! global registry — and validates the descriptor schema version before
//! any pass runs.

pub mod blue_green;
pub mod references;
pub mod user_provided;

use log::info;

use crate::descriptor::{ApplicationColor, DeploymentDescriptor};
use crate::error::{Error, Result};
use crate::platform::{
    CloudTarget, DeployedColorDetector, Platform, ResourceTypeResolver, StaticColorHistory,
};
use crate::store::{ConfigurationEntryStore, FileStore};

/// The resolved pass set and collaborators for one deployment operation.
pub struct DescriptorResolver {
    store: Box<dyn ConfigurationEntryStore>,
    resource_types: Box<dyn ResourceTypeResolver>,
    color_history: Box<dyn DeployedColorDetector>,
    current_target: CloudTarget,
    color: Option<ApplicationColor>,
}

impl DescriptorResolver {
    /// A resolver with default collaborators: an empty entry store, the
    /// built-in platform table, no deployment history, and no blue/green
    /// color.
    pub fn new(current_target: CloudTarget) -> Self {
        Self {
            store: Box::new(FileStore::empty()),
            resource_types: Box::new(Platform::built_in()),
            color_history: Box::new(StaticColorHistory::default()),
            current_target,
            color: None,
        }
    }

    pub fn with_store(mut self, store: Box<dyn ConfigurationEntryStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_resource_types(mut self, resource_types: Box<dyn ResourceTypeResolver>) -> Self {
        self.resource_types = resource_types;
        self
    }

    pub fn with_color_history(mut self, color_history: Box<dyn DeployedColorDetector>) -> Self {
        self.color_history = color_history;
        self
    }

    /// Enable the blue/green passes for a deployment of `color`.
    pub fn with_color(mut self, color: Option<ApplicationColor>) -> Self {
        self.color = color;
        self
    }

    /// Run the full pass sequence over `descriptor`.
    pub fn resolve(&self, descriptor: DeploymentDescriptor) -> Result<DeploymentDescriptor> {
        if !descriptor.has_supported_schema_version() {
            return Err(Error::UnsupportedSchemaVersion {
                version: descriptor.schema_version.clone(),
            });
        }

        info!(
            "resolving descriptor '{}' for target '{}'",
            descriptor.id, self.current_target
        );

        let descriptor = user_provided::execute(descriptor, &*self.resource_types)?;
        let descriptor =
            references::execute(descriptor, &*self.store, &self.current_target)?;

        let descriptor = match self.color {
            Some(color) => {
                let previously_deployed = self.color_history.deployed_color(&descriptor.id)?;
                blue_green::execute(descriptor, color, previously_deployed)?
            }
            None => descriptor,
        };

        Ok(descriptor)
    }
}
