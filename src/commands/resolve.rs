//! Resolve command implementation
//!
//! The resolve command executes the full pass sequence over one
//! descriptor:
//! 1. User-provided service synthesis
//! 2. Configuration reference resolution against the entries file
//! 3. Blue/green zero-downtime appending (when a deployment color is set)
//!
//! The resolved descriptor is emitted as YAML, to stdout or to the file
//! given with `--output`.

use anyhow::Result;
use clap::{Args, ValueEnum};
use console::style;
use std::path::PathBuf;

use mta_resolve::builders::target_from_space_name;
use mta_resolve::descriptor::{self, ApplicationColor};
use mta_resolve::passes::DescriptorResolver;
use mta_resolve::platform::{Platform, StaticColorHistory};
use mta_resolve::store::FileStore;

/// Blue/green colors accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorArg {
    Blue,
    Green,
}

impl From<ColorArg> for ApplicationColor {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Blue => ApplicationColor::Blue,
            ColorArg::Green => ApplicationColor::Green,
        }
    }
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the deployment descriptor
    #[arg(short, long, value_name = "PATH", default_value = "mtad.yaml")]
    pub descriptor: PathBuf,

    /// Deploy target as "<org> <space>"
    #[arg(short, long, value_name = "TARGET")]
    pub target: String,

    /// Path to a YAML file of published configuration entries
    #[arg(long, value_name = "PATH")]
    pub entries: Option<PathBuf>,

    /// Path to a platform resource-type table
    #[arg(long, value_name = "PATH")]
    pub platform: Option<PathBuf>,

    /// Deploy as this blue/green color (enables zero-downtime rewriting)
    #[arg(long, value_name = "COLOR", value_enum)]
    pub live_color: Option<ColorArg>,

    /// The color already deployed for this MTA, if any
    #[arg(long, value_name = "COLOR", value_enum)]
    pub deployed_color: Option<ColorArg>,

    /// Write the resolved descriptor to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Suppress all output except errors and the resolved descriptor
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    if !args.descriptor.exists() {
        anyhow::bail!("Descriptor file not found: {}", args.descriptor.display());
    }

    let target = target_from_space_name(&args.target)?;
    let parsed = descriptor::from_file(&args.descriptor)?;

    if !args.quiet {
        eprintln!(
            "{} Resolving {} for target {}",
            style("→").cyan(),
            args.descriptor.display(),
            style(&target).bold()
        );
    }

    let store = match &args.entries {
        Some(path) => FileStore::from_file(path)?,
        None => FileStore::empty(),
    };
    let platform = match &args.platform {
        Some(path) => Platform::from_file(path)?,
        None => Platform::built_in(),
    };

    let resolver = DescriptorResolver::new(target)
        .with_store(Box::new(store))
        .with_resource_types(Box::new(platform))
        .with_color(args.live_color.map(ApplicationColor::from))
        .with_color_history(Box::new(StaticColorHistory::new(
            args.deployed_color.map(ApplicationColor::from),
        )));

    let resolved = resolver.resolve(parsed)?;
    let yaml = resolved.to_yaml()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &yaml)?;
            if !args.quiet {
                eprintln!(
                    "{} Resolved descriptor written to {}",
                    style("✓").green(),
                    path.display()
                );
            }
        }
        None => {
            print!("{}", yaml);
        }
    }

    Ok(())
}
