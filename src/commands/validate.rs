//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a
//! deployment descriptor without resolving it.
//!
//! ## Functionality
//!
//! - **Descriptor parsing**: parses the descriptor and reports syntax or
//!   structural problems (including duplicate resource names).
//! - **Schema version**: rejects schema versions the resolution passes do
//!   not support.
//! - **Dependency check**: verifies that every module's required
//!   dependency names exist in the descriptor.
//! - **Zero-downtime precheck**: reports opted-in container deployers
//!   that are not bound to exactly one container.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use mta_resolve::descriptor::{self, bool_property, Dependency, ModuleKind, ResourceKind};
use mta_resolve::keys;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the deployment descriptor to validate
    #[arg(short, long, value_name = "PATH", default_value = "mtad.yaml")]
    pub descriptor: PathBuf,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs) -> Result<()> {
    println!(
        "{} Validating descriptor: {}",
        style("→").cyan(),
        args.descriptor.display()
    );

    if !args.descriptor.exists() {
        anyhow::bail!("Descriptor file not found: {}", args.descriptor.display());
    }

    let parsed = match descriptor::from_file(&args.descriptor) {
        Ok(parsed) => {
            println!("{} Descriptor parsed successfully", style("✓").green());
            parsed
        }
        Err(e) => {
            println!("{} Descriptor parsing failed: {}", style("✗").red(), e);
            anyhow::bail!("Descriptor parsing failed");
        }
    };

    let mut has_errors = false;

    println!();
    println!("  MTA id:     {}", parsed.id);
    println!("  Version:    {}", parsed.version);
    println!("  Modules:    {}", parsed.modules.len());
    println!("  Resources:  {}", parsed.resources.len());

    if !parsed.has_supported_schema_version() {
        println!(
            "{} Unsupported schema version: {}",
            style("✗").red(),
            parsed.schema_version
        );
        has_errors = true;
    }

    // Every required dependency name must exist in the descriptor.
    for module in &parsed.modules {
        for name in &module.requires {
            if let Err(e) = parsed.dependency(module, name) {
                println!("{} {}", style("✗").red(), e);
                has_errors = true;
            }
        }
    }

    // Opted-in container deployers must be bound to exactly one container.
    for module in &parsed.modules {
        let opted_in = module.kind() == ModuleKind::ZeroDowntimeDeployer
            || (module.kind() == ModuleKind::ContainerDeployer
                && bool_property(&parsed.module_property_chain(module), keys::PARAM_ZDM_MODE));
        if !opted_in {
            continue;
        }

        let containers = module
            .requires
            .iter()
            .filter(|name| {
                matches!(
                    parsed.dependency(module, name),
                    Ok(Dependency::Resource(resource))
                        if resource.kind() == ResourceKind::Container
                )
            })
            .count();
        if containers != 1 {
            println!(
                "{} Zero-downtime module \"{}\" is bound to {} containers (expected exactly 1)",
                style("✗").red(),
                module.name,
                containers
            );
            has_errors = true;
        }
    }

    println!();
    if has_errors {
        println!(
            "{} Descriptor has errors that must be fixed",
            style("✗").red()
        );
        anyhow::bail!("Descriptor validation failed");
    }

    println!("{} Descriptor is valid", style("✓").green());
    Ok(())
}
