//! User-provided service resolution pass.
//!
//! A module can ask the deployer to create a user-provided service on its
//! behalf: `create-user-provided-service: true` plus a non-empty
//! `user-provided-service-name`. This pass synthesizes the backing
//! resource — typed through the platform's resource-type table, carrying
//! the optional `user-provided-service-config` map as its
//! `service-config` property — appends it to the descriptor's resource
//! list, and wires the module to it.
//!
//! Modules without the flag (or with an empty name) are left untouched.
//! Re-running the pass over an already rewritten descriptor changes
//! nothing: the resource exists and the module already requires it, so the
//! uniqueness invariant is preserved.

use log::debug;
use serde_json::Value;

use crate::builders::ResourceBuilder;
use crate::descriptor::{
    bool_property, str_property, DeploymentDescriptor, Module, Properties,
};
use crate::error::Result;
use crate::keys;
use crate::platform::ResourceTypeResolver;
use crate::visitor::{self, DescriptorVisitor};

/// One planned service synthesis: which module asked, what the resource
/// should look like.
struct PlannedService {
    module: String,
    service_name: String,
    service_type: String,
    service_config: Properties,
}

struct ServiceCollector<'a> {
    resource_types: &'a dyn ResourceTypeResolver,
    planned: Vec<PlannedService>,
}

impl DescriptorVisitor for ServiceCollector<'_> {
    fn on_module(&mut self, descriptor: &DeploymentDescriptor, module: &Module) -> Result<()> {
        let chain = descriptor.module_property_chain(module);

        if !bool_property(&chain, keys::PARAM_CREATE_USER_PROVIDED_SERVICE) {
            return Ok(());
        }
        let Some(service_name) = str_property(&chain, keys::PARAM_USER_PROVIDED_SERVICE_NAME)
        else {
            return Ok(());
        };
        if service_name.is_empty() {
            return Ok(());
        }

        let service_config = match chain.get(keys::PARAM_USER_PROVIDED_SERVICE_CONFIG) {
            Some(Value::Object(map)) => map.clone(),
            _ => Properties::new(),
        };

        let service_type = self
            .resource_types
            .type_name_for(keys::USER_PROVIDED_SERVICE_MARKER)?;

        self.planned.push(PlannedService {
            module: module.name.clone(),
            service_name: service_name.to_string(),
            service_type,
            service_config,
        });
        Ok(())
    }
}

/// Synthesize the requested user-provided services and wire their modules
/// to them.
pub fn execute(
    descriptor: DeploymentDescriptor,
    resource_types: &dyn ResourceTypeResolver,
) -> Result<DeploymentDescriptor> {
    let mut collector = ServiceCollector {
        resource_types,
        planned: Vec::new(),
    };
    visitor::walk(&descriptor, &mut collector)?;

    let mut descriptor = descriptor;
    for planned in collector.planned {
        debug!(
            "module '{}' requested user-provided service '{}'",
            planned.module, planned.service_name
        );

        if let Some(module) = descriptor
            .modules
            .iter_mut()
            .find(|m| m.name == planned.module)
        {
            if !module.requires.contains(&planned.service_name) {
                module.requires.push(planned.service_name.clone());
            }
        }

        if descriptor.resource(&planned.service_name).is_none() {
            let resource = ResourceBuilder::new(&planned.service_name)
                .with_type(planned.service_type)
                .with_property(
                    keys::PARAM_SERVICE_CONFIG,
                    Value::Object(planned.service_config),
                )
                .build();
            descriptor.resources.push(resource);
        }
    }

    descriptor.ensure_unique_resource_names()?;
    Ok(descriptor)
}
