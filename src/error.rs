//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `mta-resolve` library. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! Two families of failures exist, both synchronous and non-retryable at
//! this layer:
//!
//! - **Content errors**: the descriptor's content is inconsistent with what
//!   a pass requires — a configuration reference resolving to zero or more
//!   than one entry, a zero-downtime module without exactly one bound
//!   container, reuse of a reserved service-replacement key, or a duplicate
//!   resource name. Each variant carries the offending resource/module name
//!   for user display.
//!
//! - **Resource-not-found errors**: a module's declared required dependency
//!   name does not exist anywhere in the descriptor.
//!
//! Parse and serialization failures (`serde_yaml`, `serde_json`, I/O) are
//! wrapped so that `?` propagation works across the whole pipeline. The
//! `Result` type alias is used throughout the library.

use thiserror::Error;

/// Main error type for descriptor-resolution operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing a deployment descriptor file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Descriptor parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    DescriptorParse {
        message: String,
        /// Optional hint for how to fix the descriptor issue
        hint: Option<String>,
    },

    /// The descriptor declares a schema version this pipeline does not
    /// support.
    #[error("Unsupported descriptor schema version: {version}")]
    UnsupportedSchemaVersion { version: String },

    /// A configuration reference matched no entries in the store.
    #[error("No configuration entries were found for resource \"{resource}\"")]
    NoConfigurationEntries { resource: String },

    /// A configuration reference matched more than one entry in the store.
    #[error("Multiple configuration entries were found for resource \"{resource}\"")]
    MultipleConfigurationEntries { resource: String },

    /// A legacy provided-dependency reference is missing one of its
    /// mandatory parameters.
    #[error("Resource \"{resource}\" is missing required reference parameter \"{parameter}\"")]
    MissingReferenceParameter { resource: String, parameter: String },

    /// A module retyped for zero-downtime redeployment does not have
    /// exactly one container-type required dependency.
    #[error("Module \"{module}\" does not have only one bound resource")]
    NotOnlyOneBoundResource { module: String },

    /// A module declared a service replacement using one of the reserved
    /// logical container keys.
    #[error("Module \"{module}\" uses reserved service-replacement key \"{key}\"")]
    ReservedServiceKey { module: String, key: String },

    /// A required dependency name does not resolve to any resource or
    /// module in the descriptor.
    #[error("Required dependency \"{dependency}\" of module \"{module}\" was not found in the descriptor")]
    DependencyNotFound { module: String, dependency: String },

    /// Two resources in the descriptor share the same name.
    #[error("Duplicate resource name \"{name}\" in descriptor")]
    DuplicateResourceName { name: String },

    /// A deploy-target name does not follow the `<org> <space>` pattern.
    #[error("Malformed deploy target \"{name}\": expected \"<org> <space>\"")]
    MalformedTarget { name: String },

    /// The platform declares no resource type for a requested marker.
    #[error("Unknown resource type \"{marker}\"")]
    UnknownResourceType { marker: String },

    /// An error occurred while querying the configuration-entry store.
    #[error("Configuration store error: {message}")]
    Store { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Whether this error reports inconsistent descriptor content (as
    /// opposed to a missing dependency or an infrastructure failure).
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Error::NoConfigurationEntries { .. }
                | Error::MultipleConfigurationEntries { .. }
                | Error::MissingReferenceParameter { .. }
                | Error::NotOnlyOneBoundResource { .. }
                | Error::ReservedServiceKey { .. }
                | Error::DuplicateResourceName { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
