//! Container configuration. By default, the config is created with opinionated default values,
//! which can then be overwritten by environment variables prefixed with `SCOPED_DI_` or the
//! `scoped-di.json` file. See [ContainerBuilder](crate::container::ContainerBuilder) for applying a
//! config to a container.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_ENV_PREFIX: &str = "SCOPED_DI";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "scoped-di.json";

/// Default limit of nested constructions.
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 128;

/// Configuration of a [Container](crate::container::Container).
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContainerConfig {
    /// Should registering an already registered type replace the previous registration, rather
    /// than fail.
    pub allow_definition_overriding: bool,
    /// How many constructions can be nested while resolving dependencies.
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            allow_definition_overriding: true,
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
        }
    }
}

impl From<OptionalContainerConfig> for ContainerConfig {
    fn from(value: OptionalContainerConfig) -> Self {
        let default = Self::default();
        Self {
            allow_definition_overriding: value
                .allow_definition_overriding
                .unwrap_or(default.allow_definition_overriding),
            max_resolution_depth: value
                .max_resolution_depth
                .unwrap_or(default.max_resolution_depth),
        }
    }
}

impl ContainerConfig {
    /// Reads the config from the default config file and the environment, falling back to default
    /// values.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(environment())
            .build()
            .and_then(Self::from_config)
    }

    /// Reads the config from already collected sources, falling back to default values.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config
            .try_deserialize::<OptionalContainerConfig>()
            .map(|config| config.into())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(CONFIG_ENV_PREFIX).try_parsing(true)
}

#[derive(Deserialize)]
struct OptionalContainerConfig {
    allow_definition_overriding: Option<bool>,
    max_resolution_depth: Option<usize>,
}
