//! Blue/green zero-downtime resource appending pass.
//!
//! Rewrites a descriptor for blue/green redeployment. Container-deployer
//! modules (`hdi`) that opted in with `zdm-mode: true` are retyped to the
//! zero-downtime deployer type (`hdi-zdm`) and their single bound
//! container is duplicated into the data/access/temp triple the
//! zero-downtime scheme runs on:
//!
//! - `data` is the container the module already required;
//! - `access` is a new container named `<data>access<color-suffix>`;
//! - `temp` is a new container named `<data>temp`.
//!
//! The module keeps its non-container dependencies and is rewired to all
//! three containers, its deploy properties are set (target container,
//! deploy mode, install-or-start action), and a JSON-encoded service
//! replacement list binds the three reserved logical service keys to the
//! triple. Every other module that consumed the `data` container is
//! repointed to the `access` container, both in its dependency list and
//! inside its free-text binding configuration.
//!
//! Independent of the container surgery, every module's effective
//! application name receives the current color's suffix. Content errors
//! abort the pass; the descriptor is caller-disposable on failure, so
//! nothing is rolled back.

use std::collections::HashMap;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builders::ResourceBuilder;
use crate::descriptor::{
    bool_property, ApplicationColor, Dependency, DeploymentDescriptor, Module, ModuleKind,
    ResourceKind,
};
use crate::error::{Error, Result};
use crate::keys;

/// The zero-downtime action of this deployment: first-time installation of
/// a blue/green pair, or activation of the next color of an installed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZdmAction {
    Install,
    Start,
}

impl ZdmAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ZdmAction::Install => "install",
            ZdmAction::Start => "start",
        }
    }
}

/// One logical-service-to-container binding in the replacement list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReplacement {
    pub key: String,
    pub service: String,
}

/// The data/access/temp container triple of one zero-downtime module.
/// Scratch state, alive only for the duration of one pass.
#[derive(Debug, Clone)]
struct ContainerRoles {
    data: String,
    access: String,
    temp: String,
}

/// Planned surgery for one zero-downtime module.
struct ModulePlan {
    index: usize,
    requires: Vec<String>,
    roles: ContainerRoles,
    replacements: String,
}

/// Rewrite `descriptor` for a blue/green deployment of `color`.
/// `previously_deployed` is the color already live for this MTA, if any.
pub fn execute(
    descriptor: DeploymentDescriptor,
    color: ApplicationColor,
    previously_deployed: Option<ApplicationColor>,
) -> Result<DeploymentDescriptor> {
    let mut descriptor = descriptor;

    retype_opted_in_modules(&mut descriptor);

    let zdm_modules: Vec<usize> = descriptor
        .modules
        .iter()
        .enumerate()
        .filter(|(_, module)| module.kind() == ModuleKind::ZeroDowntimeDeployer)
        .map(|(index, _)| index)
        .collect();

    if !zdm_modules.is_empty() {
        let action = if previously_deployed.is_some() {
            ZdmAction::Start
        } else {
            ZdmAction::Install
        };
        debug!(
            "{} zero-downtime module(s), action '{}'",
            zdm_modules.len(),
            action.as_str()
        );

        let mut roles_by_app: HashMap<String, ContainerRoles> = HashMap::new();
        let mut plans = Vec::with_capacity(zdm_modules.len());
        for index in zdm_modules {
            let plan = plan_module(&descriptor, index, color)?;
            roles_by_app.insert(
                format!("{}{}", descriptor.modules[index].app_name(), color.as_suffix()),
                plan.roles.clone(),
            );
            plans.push(plan);
        }

        apply_plans(&mut descriptor, plans, action);
        rewire_consumers(&mut descriptor, &roles_by_app)?;
    }

    append_application_colors(&mut descriptor, color);

    descriptor.ensure_unique_resource_names()?;
    Ok(descriptor)
}

/// Retype every generic container deployer that opted into zero-downtime
/// redeployment.
fn retype_opted_in_modules(descriptor: &mut DeploymentDescriptor) {
    let opted_in: Vec<usize> = descriptor
        .modules
        .iter()
        .enumerate()
        .filter(|(_, module)| {
            module.kind() == ModuleKind::ContainerDeployer
                && bool_property(
                    &descriptor.module_property_chain(module),
                    keys::PARAM_ZDM_MODE,
                )
        })
        .map(|(index, _)| index)
        .collect();

    for index in opted_in {
        let module = &mut descriptor.modules[index];
        debug!("retyping module '{}' for zero-downtime deployment", module.name);
        module.r#type = keys::MODULE_TYPE_HDI_ZDM.to_string();
    }
}

/// Compute the container triple and rewired dependency list of one
/// zero-downtime module without touching the descriptor.
fn plan_module(
    descriptor: &DeploymentDescriptor,
    index: usize,
    color: ApplicationColor,
) -> Result<ModulePlan> {
    let module = &descriptor.modules[index];

    let mut containers = Vec::new();
    let mut others = Vec::new();
    for name in &module.requires {
        match descriptor.dependency(module, name)? {
            Dependency::Resource(resource) if resource.kind() == ResourceKind::Container => {
                containers.push(name.clone());
            }
            _ => others.push(name.clone()),
        }
    }

    if containers.len() != 1 {
        return Err(Error::NotOnlyOneBoundResource {
            module: module.name.clone(),
        });
    }

    let data = containers.into_iter().next().unwrap_or_default();
    let roles = ContainerRoles {
        access: format!("{}{}{}", data, keys::ACCESS_CONTAINER_SUFFIX, color.as_suffix()),
        temp: format!("{}{}", data, keys::TEMP_CONTAINER_SUFFIX),
        data,
    };

    let replacements = merged_service_replacements(module, &roles)?;

    let mut requires = others;
    requires.push(roles.data.clone());
    requires.push(roles.access.clone());
    requires.push(roles.temp.clone());

    Ok(ModulePlan {
        index,
        requires,
        roles,
        replacements,
    })
}

/// Merge the appender's three logical-service replacements with whatever
/// the module declared itself, rejecting reserved keys.
fn merged_service_replacements(module: &Module, roles: &ContainerRoles) -> Result<String> {
    let mut replacements = declared_service_replacements(module)?;
    for replacement in &replacements {
        if keys::RESERVED_SERVICE_KEYS.contains(&replacement.key.as_str()) {
            return Err(Error::ReservedServiceKey {
                module: module.name.clone(),
                key: replacement.key.clone(),
            });
        }
    }

    replacements.push(ServiceReplacement {
        key: keys::DATA_SERVICE_KEY.to_string(),
        service: roles.data.clone(),
    });
    replacements.push(ServiceReplacement {
        key: keys::ACCESS_SERVICE_KEY.to_string(),
        service: roles.access.clone(),
    });
    replacements.push(ServiceReplacement {
        key: keys::TEMP_SERVICE_KEY.to_string(),
        service: roles.temp.clone(),
    });

    Ok(serde_json::to_string(&replacements)?)
}

fn declared_service_replacements(module: &Module) -> Result<Vec<ServiceReplacement>> {
    match module.properties.get(keys::PROP_SERVICE_REPLACEMENTS) {
        None => Ok(Vec::new()),
        Some(Value::String(raw)) => Ok(serde_json::from_str(raw)?),
        Some(other) => Ok(serde_json::from_value(other.clone())?),
    }
}

/// Apply the planned surgery: rewire the zero-downtime modules, set their
/// deploy properties, and add the access/temp containers to the
/// descriptor.
fn apply_plans(descriptor: &mut DeploymentDescriptor, plans: Vec<ModulePlan>, action: ZdmAction) {
    let mut added: Vec<String> = Vec::new();

    for plan in plans {
        let module = &mut descriptor.modules[plan.index];
        module.requires = plan.requires;
        module.properties.insert(
            keys::PROP_TARGET_CONTAINER.to_string(),
            Value::String(plan.roles.data.clone()),
        );
        module.properties.insert(
            keys::PROP_DEPLOY_MODE.to_string(),
            Value::String(keys::DEPLOY_MODE_ZDM.to_string()),
        );
        module.properties.insert(
            keys::PROP_ZDM_ACTION.to_string(),
            Value::String(action.as_str().to_string()),
        );
        module.properties.insert(
            keys::PROP_SERVICE_REPLACEMENTS.to_string(),
            Value::String(plan.replacements),
        );

        // Two modules bound to the same data container share one
        // access/temp pair.
        for name in [plan.roles.access, plan.roles.temp] {
            if !added.contains(&name) {
                added.push(name);
            }
        }
    }

    for name in added {
        descriptor.resources.push(
            ResourceBuilder::new(name)
                .with_type(keys::RESOURCE_TYPE_CONTAINER)
                .build(),
        );
    }
}

/// Repoint every non-deployer module from the data containers to their
/// access containers, in both the dependency list and the free-text
/// binding configuration.
fn rewire_consumers(
    descriptor: &mut DeploymentDescriptor,
    roles_by_app: &HashMap<String, ContainerRoles>,
) -> Result<()> {
    let access_by_data: HashMap<&str, &str> = roles_by_app
        .values()
        .map(|roles| (roles.data.as_str(), roles.access.as_str()))
        .collect();

    for module in &mut descriptor.modules {
        if module.kind() != ModuleKind::Other {
            continue;
        }

        for name in &mut module.requires {
            if let Some(access) = access_by_data.get(name.as_str()) {
                *name = access.to_string();
            }
        }

        let binding = module
            .properties
            .get(keys::PROP_SERVICE_BINDING_CONFIG)
            .and_then(Value::as_str)
            .map(str::to_owned);
        if let Some(mut rewritten) = binding {
            for (data, access) in &access_by_data {
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(data)))?;
                rewritten = pattern.replace_all(&rewritten, *access).into_owned();
            }
            module.properties.insert(
                keys::PROP_SERVICE_BINDING_CONFIG.to_string(),
                Value::String(rewritten),
            );
        }
    }
    Ok(())
}

/// Append the current color's suffix to every module's effective
/// application name.
fn append_application_colors(descriptor: &mut DeploymentDescriptor, color: ApplicationColor) {
    for module in &mut descriptor.modules {
        let colored = format!("{}{}", module.app_name(), color.as_suffix());
        module
            .properties
            .insert(keys::PROP_APP_NAME.to_string(), Value::String(colored));
    }
}
