//! Well-known descriptor vocabulary.
//!
//! Type tags, parameter names, and reserved keys that the resolution passes
//! recognize in a deployment descriptor. Every string literal the pipeline
//! matches against lives here and is classified once at the parsing
//! boundary; the passes themselves work with the `ModuleKind` and
//! `ResourceKind` enums from the `descriptor` module.

/// Module type tag of a generic database-container deployer.
pub const MODULE_TYPE_HDI: &str = "hdi";

/// Module type tag of a container deployer retyped for zero-downtime
/// redeployment.
pub const MODULE_TYPE_HDI_ZDM: &str = "hdi-zdm";

/// Resource type tag of a database container.
pub const RESOURCE_TYPE_CONTAINER: &str = "hdi-container";

/// Resource type tag of a legacy provided-dependency reference.
pub const RESOURCE_TYPE_PROVIDES_DEPENDENCY: &str = "mta-provides-dependency";

/// Resource type tag of a configuration reference.
pub const RESOURCE_TYPE_CONFIGURATION: &str = "configuration";

/// Provider namespace used for entries published by deployed MTAs.
pub const PROVIDER_NID_MTA: &str = "mta";

// Legacy reference parameters.
pub const PARAM_MTA_ID: &str = "mta-id";
pub const PARAM_MTA_PROVIDES_DEPENDENCY: &str = "mta-provides-dependency";
pub const PARAM_MTA_VERSION: &str = "mta-version";

// Current-form reference parameters.
pub const PARAM_VERSION: &str = "version";
pub const PARAM_PROVIDER_NID: &str = "provider-nid";
pub const PARAM_PROVIDER_ID: &str = "provider-id";
pub const PARAM_TARGET: &str = "target";
pub const PARAM_FILTER: &str = "filter";
pub const PARAM_TARGET_ORG: &str = "org";
pub const PARAM_TARGET_SPACE: &str = "space";

/// Reference-declaration parameters stripped from a resource's properties
/// before they are merged with a configuration entry's content.
pub const REFERENCE_PARAMETERS: [&str; 8] = [
    PARAM_MTA_ID,
    PARAM_MTA_PROVIDES_DEPENDENCY,
    PARAM_MTA_VERSION,
    PARAM_VERSION,
    PARAM_PROVIDER_NID,
    PARAM_PROVIDER_ID,
    PARAM_TARGET,
    PARAM_FILTER,
];

// User-provided service parameters.
pub const PARAM_CREATE_USER_PROVIDED_SERVICE: &str = "create-user-provided-service";
pub const PARAM_USER_PROVIDED_SERVICE_NAME: &str = "user-provided-service-name";
pub const PARAM_USER_PROVIDED_SERVICE_CONFIG: &str = "user-provided-service-config";
pub const PARAM_SERVICE_CONFIG: &str = "service-config";

/// Resource-type marker resolved through the platform table when a
/// user-provided service is synthesized.
pub const USER_PROVIDED_SERVICE_MARKER: &str = "user-provided-service";

// Zero-downtime parameters and properties.
pub const PARAM_ZDM_MODE: &str = "zdm-mode";
pub const PROP_APP_NAME: &str = "app-name";
pub const PROP_TARGET_CONTAINER: &str = "target-container";
pub const PROP_DEPLOY_MODE: &str = "deploy-mode";
pub const DEPLOY_MODE_ZDM: &str = "zdm";
pub const PROP_ZDM_ACTION: &str = "zdm-action";
pub const PROP_SERVICE_REPLACEMENTS: &str = "service-replacements";

/// Free-text binding configuration rewritten when data containers are
/// swapped for their access containers.
pub const PROP_SERVICE_BINDING_CONFIG: &str = "service-binding-config";

/// Name suffix of a synthesized access container (color suffix follows).
pub const ACCESS_CONTAINER_SUFFIX: &str = "access";

/// Name suffix of a synthesized temporary container (never color-suffixed).
pub const TEMP_CONTAINER_SUFFIX: &str = "temp";

// Reserved logical service-replacement keys. Descriptor authors must not
// bind these themselves; the appender owns them.
pub const DATA_SERVICE_KEY: &str = "hdi-data-service";
pub const ACCESS_SERVICE_KEY: &str = "hdi-access-service";
pub const TEMP_SERVICE_KEY: &str = "hdi-temp-service";

/// All reserved logical service-replacement keys.
pub const RESERVED_SERVICE_KEYS: [&str; 3] =
    [DATA_SERVICE_KEY, ACCESS_SERVICE_KEY, TEMP_SERVICE_KEY];
