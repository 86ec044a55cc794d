//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::details::DetailsContext;
use crate::core::selection::DEFAULT_KEY_PREFIX;

/// Name of the per-directory config file
pub const PROJECT_CONFIG_FILE: &str = ".repmat.yaml";

/// Default currency when neither config nor price data name one
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Repair matrix configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Context prefix for rendered selection keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,

    /// Currency shown in the details dialog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Warehouse label shown in the details dialog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/repmat/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (./.repmat.yaml)
        if let Some(project) = Self::read_file(Path::new(PROJECT_CONFIG_FILE)) {
            config.merge(project);
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "repmat")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Read one config layer; unreadable or malformed files are ignored
    pub fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring malformed config file"
                );
                None
            }
        }
    }

    /// Build the environment layer through a variable lookup
    fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            key_prefix: lookup("REPMAT_KEY_PREFIX"),
            currency: lookup("REPMAT_CURRENCY"),
            warehouse: lookup("REPMAT_WAREHOUSE"),
            default_format: lookup("REPMAT_FORMAT"),
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.key_prefix.is_some() {
            self.key_prefix = other.key_prefix;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
        if other.warehouse.is_some() {
            self.warehouse = other.warehouse;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    pub fn key_prefix(&self) -> &str {
        self.key_prefix.as_deref().unwrap_or(DEFAULT_KEY_PREFIX)
    }

    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Display context for the details dialog
    pub fn details_context(&self) -> DetailsContext {
        DetailsContext {
            currency: self.currency().to_string(),
            warehouse: self.warehouse.clone(),
        }
    }
}
