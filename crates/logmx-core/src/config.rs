//! Configuration management for logmx.
//!
//! This module provides multi-layer configuration support with:
//! - File-based configuration (YAML)
//! - Environment variable overrides
//! - Programmatic updates
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Environment variables
//! 2. Programmatically set values
//! 3. Values loaded from file
//! 4. Default values
//!
//! Environment variables are mapped by stripping the prefix, lowercasing, and
//! treating `__` as a nesting separator: `LOGMX_LOG__FILTER=debug` sets
//! `log.filter`.
//!
//! ## Example
//!
//! ```no_run
//! use logmx_core::config::ManagementConfig;
//!
//! let config = ManagementConfig::load_from("/etc/logmx/config")?;
//! println!("registering under {}", config.object_name);
//! # Ok::<(), logmx_types::LogMxError>(())
//! ```

use indexmap::IndexMap;
use logmx_types::config::LogConfig;
use logmx_types::{Level, LogMxError, Result, DEFAULT_OBJECT_NAME};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment variables read by [`ManagementConfig::load_from`].
pub const ENV_PREFIX: &str = "LOGMX_";

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values loaded from file
    Loaded = 1,
    /// Values set programmatically
    Set = 2,
    /// Values from environment variables
    Environment = 3,
}

impl ConfigLayer {
    const LOWEST_FIRST: [ConfigLayer; 4] = [
        ConfigLayer::Default,
        ConfigLayer::Loaded,
        ConfigLayer::Set,
        ConfigLayer::Environment,
    ];
}

/// Layered configuration store.
///
/// This is the low-level configuration type; [`ManagementConfig`] is the
/// typed view of it.
#[derive(Clone, Debug, Default)]
pub struct Config {
    layers: HashMap<ConfigLayer, Value>,
    file_path: Option<PathBuf>,
    auto_save: bool,
}

impl Config {
    /// Create an empty configuration with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new configuration from a file path.
    ///
    /// If the file doesn't exist, an empty configuration is created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut layers = HashMap::new();

        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| LogMxError::Config(format!("Failed to read config file: {}", e)))?;

            let value: Value = serde_yaml::from_str(&content)
                .map_err(|e| LogMxError::Config(format!("Failed to parse config: {}", e)))?;

            if !value.is_null() {
                layers.insert(ConfigLayer::Loaded, value);
            }
        }

        Ok(Self {
            layers,
            file_path: Some(path.to_path_buf()),
            auto_save: false,
        })
    }

    /// Install default values from a serializable structure.
    pub fn with_defaults(mut self, defaults: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(defaults)
            .map_err(|e| LogMxError::Config(format!("Failed to serialize defaults: {}", e)))?;
        self.layers.insert(ConfigLayer::Default, value);
        Ok(self)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self, prefix: &str) -> Self {
        self.with_env_vars(prefix, std::env::vars())
    }

    /// Apply overrides from `vars`, keeping only names starting with `prefix`.
    pub fn with_env_vars<I, K, V>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut env_layer = Value::Object(Default::default());

        for (key, raw) in vars {
            let Some(stripped) = key.as_ref().strip_prefix(prefix) else {
                continue;
            };
            if stripped.is_empty() {
                continue;
            }

            let path = stripped.to_lowercase().replace("__", ".");
            // Malformed names such as `LOGMX_A__` are skipped.
            let _ = Self::set_value_at_path(&mut env_layer, &path, Self::parse_env_value(raw.as_ref()));
        }

        self.layers.insert(ConfigLayer::Environment, env_layer);
        self
    }

    /// Enable auto-save on changes.
    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    /// Get a configuration value by dotted key, respecting layer priority.
    ///
    /// Returns None if the key doesn't exist in any layer.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        for layer in ConfigLayer::LOWEST_FIRST.iter().rev() {
            if let Some(value) = self.layers.get(layer).and_then(|data| Self::get_value_at_path(data, key)) {
                if let Ok(typed_value) = serde_json::from_value(value.clone()) {
                    return Some(typed_value);
                }
            }
        }

        None
    }

    /// Set a configuration value programmatically.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| LogMxError::Config(format!("Failed to serialize value: {}", e)))?;

        let set_layer = self
            .layers
            .entry(ConfigLayer::Set)
            .or_insert_with(|| Value::Object(Default::default()));

        Self::set_value_at_path(set_layer, key, value)?;

        if self.auto_save {
            self.save()?;
        }

        Ok(())
    }

    /// Save configuration to file.
    ///
    /// Environment overrides are not written back.
    pub fn save(&self) -> Result<()> {
        let path = self
            .file_path
            .as_ref()
            .ok_or_else(|| LogMxError::Config("Cannot save: no file path set".to_string()))?;

        let mut merged = Value::Object(Default::default());
        for layer in [ConfigLayer::Default, ConfigLayer::Loaded, ConfigLayer::Set] {
            if let Some(data) = self.layers.get(&layer) {
                merged = deep_merge(merged, data.clone());
            }
        }

        let yaml = serde_yaml::to_string(&merged)
            .map_err(|e| LogMxError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)
            .map_err(|e| LogMxError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get merged data from all layers.
    pub fn merged(&self) -> Value {
        ConfigLayer::LOWEST_FIRST
            .iter()
            .filter_map(|layer| self.layers.get(layer))
            .fold(Value::Object(Default::default()), |merged, data| deep_merge(merged, data.clone()))
    }

    /// Deserialize the merged layers into a typed configuration.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.merged())
            .map_err(|e| LogMxError::Config(format!("Invalid configuration: {}", e)))
    }

    fn parse_env_value(raw: &str) -> Value {
        match serde_yaml::from_str::<Value>(raw) {
            Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
            _ => Value::String(raw.to_string()),
        }
    }

    // Helper: Get value at dotted path
    fn get_value_at_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
        path.split('.').try_fold(data, |current, part| current.get(part))
    }

    // Helper: Set value at dotted path, creating intermediate objects
    fn set_value_at_path(data: &mut Value, path: &str, value: Value) -> Result<()> {
        let mut parts: Vec<&str> = path.split('.').collect();
        let last = parts
            .pop()
            .filter(|part| !part.is_empty())
            .ok_or_else(|| LogMxError::Config(format!("Invalid config key '{}'", path)))?;

        let mut current = data;
        for part in parts {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            current = match current {
                Value::Object(map) => map
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Default::default())),
                _ => return Err(LogMxError::Config(format!("Invalid config key '{}'", path))),
            };
        }

        if !current.is_object() {
            *current = Value::Object(Default::default());
        }
        if let Value::Object(map) = current {
            map.insert(last.to_string(), value);
        }

        Ok(())
    }
}

/// Recursively merge objects, with overlay values taking precedence.
fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay_val) => overlay_val,
    }
}

/// Settings for the management façade and diagnostic logging.
///
/// ```yaml
/// object_name: "myapp:type=Logging"
/// levels:
///   "": WARN
///   myapp.db: DEBUG
/// log:
///   filter: info
///   format: json
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementConfig {
    /// Object name the logging adapter is registered under
    #[serde(default = "default_object_name")]
    pub object_name: String,

    /// Initial logger levels; `""` is the root logger
    #[serde(default)]
    pub levels: IndexMap<String, Level>,

    /// Diagnostic log output
    #[serde(default)]
    pub log: LogConfig,
}

fn default_object_name() -> String {
    DEFAULT_OBJECT_NAME.to_string()
}

impl ManagementConfig {
    /// Load configuration from the default location.
    ///
    /// Falls back to defaults (plus environment overrides) when no home
    /// directory can be determined.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Config::new()
                .with_defaults(&Self::default())?
                .with_env_overrides(ENV_PREFIX)
                .extract(),
        }
    }

    /// Load configuration from a specific path, applying `LOGMX_*` overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Config::load(path)?
            .with_defaults(&Self::default())?
            .with_env_overrides(ENV_PREFIX)
            .extract()
    }

    /// Get the default path for configuration (`~/.logmx/config`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".logmx").join("config"))
    }
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            object_name: default_object_name(),
            levels: IndexMap::new(),
            log: LogConfig::default(),
        }
    }
}
