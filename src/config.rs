//! Source and transformer configuration.
//!
//! Settings come from an optional TOML file, overridden by `INFRAGRAPH__*`
//! environment variables:
//!
//! ```toml
//! [sources.nagios]
//! transformer = "nagios"
//! changes_interval = 30
//!
//! [sources.nagios.connection]
//! url = "http://nagios.example.com/cgi-bin/status.cgi"
//!
//! [sources.compute-hosts]
//! transformer = "nova.host"
//! changes_interval = 60
//! ```
//!
//! ```bash
//! INFRAGRAPH__SOURCES__NAGIOS__CHANGES_INTERVAL=120 infragraph --config infragraph.toml
//! ```
//!
//! With no sources configured at all, every shipped transformer is enabled
//! at the minimum interval.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use infragraph_transformers::{Registry, TransformerKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest poll interval a source may be configured with, in seconds.
pub const MIN_CHANGES_INTERVAL: u64 = 30;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file or environment could not be read or deserialized
    /// (including an unknown transformer name).
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("source '{source_name}' has changes_interval {interval}s, minimum is {minimum}s")]
    IntervalTooShort {
        source_name: String,
        interval: u64,
        minimum: u64,
    },
}

/// Settings for one configured source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Which transformer turns this source's records into graph elements.
    pub transformer: TransformerKind,

    /// Seconds between polls.
    #[serde(default = "default_changes_interval")]
    pub changes_interval: u64,

    /// Client settings for the source, passed through untouched.
    #[serde(default)]
    pub connection: BTreeMap<String, String>,
}

impl SourceConfig {
    pub fn new(transformer: TransformerKind) -> Self {
        Self {
            transformer,
            changes_interval: default_changes_interval(),
            connection: BTreeMap::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.changes_interval)
    }
}

fn default_changes_interval() -> u64 {
    MIN_CHANGES_INTERVAL
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Configured sources keyed by name.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("INFRAGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize and validate an already-built [`Config`].
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.with_defaults().validated()
    }

    /// Settings enabling every shipped transformer, one source each.
    pub fn all_sources() -> Self {
        let sources = TransformerKind::ALL
            .iter()
            .map(|kind| (kind.entity_type().to_string(), SourceConfig::new(*kind)))
            .collect();
        Self { sources }
    }

    fn with_defaults(self) -> Self {
        if self.sources.is_empty() {
            Self::all_sources()
        } else {
            self
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        for (name, source) in &self.sources {
            if source.changes_interval < MIN_CHANGES_INTERVAL {
                return Err(ConfigError::IntervalTooShort {
                    source_name: name.clone(),
                    interval: source.changes_interval,
                    minimum: MIN_CHANGES_INTERVAL,
                });
            }
        }
        Ok(self)
    }

    /// Distinct transformers the configured sources need.
    pub fn transformer_kinds(&self) -> BTreeSet<TransformerKind> {
        self.sources.values().map(|s| s.transformer).collect()
    }

    /// Build the registry of every transformer in use.
    ///
    /// References to types no configured source owns stay unresolved and are
    /// reported as warnings when transforming.
    pub fn registry(&self) -> Registry {
        self.transformer_kinds()
            .into_iter()
            .fold(Registry::builder(), |builder, kind| builder.register_kind(kind))
            .build()
    }

    /// Shortest configured interval, used as the driver's tick.
    pub fn tick(&self) -> Duration {
        let secs = self
            .sources
            .values()
            .map(|s| s.changes_interval)
            .min()
            .unwrap_or(MIN_CHANGES_INTERVAL);
        Duration::from_secs(secs)
    }
}
