use crate::error::{Result, SynergyError};
use crate::models::{ContainmentMode, JoinStrategy, LayerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for an analysis run
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Layers TOML file; `None` selects the built-in layers
    pub layers: ConfigValue<Option<PathBuf>>,
    pub containment: ConfigValue<ContainmentMode>,
    pub join_strategy: ConfigValue<JoinStrategy>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            layers: ConfigValue::new(None, ConfigSource::Default),
            containment: ConfigValue::new(ContainmentMode::default(), ConfigSource::Default),
            join_strategy: ConfigValue::new(JoinStrategy::default(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SynergyError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| SynergyError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(layers) = file_config.layers {
            // Relative layer paths are resolved against the config file
            let layers = match path.as_ref().parent() {
                Some(dir) if layers.is_relative() => dir.join(layers),
                _ => layers,
            };
            self.layers.update(Some(layers), ConfigSource::File);
        }

        if let Some(containment) = file_config.containment {
            self.containment.update(parse_containment_mode(&containment)?, ConfigSource::File);
        }

        if let Some(strategy) = file_config.join_strategy {
            self.join_strategy.update(parse_join_strategy(&strategy)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // SYNERGY_LAYERS
        if let Ok(layers) = env::var("SYNERGY_LAYERS") {
            if layers.trim().is_empty() {
                tracing::warn!("Ignoring empty SYNERGY_LAYERS value");
            } else {
                self.layers.update(Some(PathBuf::from(layers)), ConfigSource::Environment);
            }
        }

        // SYNERGY_CONTAINMENT
        if let Ok(mode_str) = env::var("SYNERGY_CONTAINMENT") {
            match parse_containment_mode(&mode_str) {
                Ok(mode) => self.containment.update(mode, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SYNERGY_CONTAINMENT value '{}': expected whole, centroid, or points-only",
                    mode_str
                ),
            }
        }

        // SYNERGY_JOIN_STRATEGY
        if let Ok(strategy_str) = env::var("SYNERGY_JOIN_STRATEGY") {
            match parse_join_strategy(&strategy_str) {
                Ok(strategy) => self.join_strategy.update(strategy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SYNERGY_JOIN_STRATEGY value '{}': expected full-scan or rtree",
                    strategy_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(layers) = overrides.layers {
            self.layers.update(Some(layers), ConfigSource::Cli);
        }

        if let Some(containment) = overrides.containment {
            self.containment.update(containment, ConfigSource::Cli);
        }

        if let Some(strategy) = overrides.join_strategy {
            self.join_strategy.update(strategy, ConfigSource::Cli);
        }
    }

    /// Resolve the layer configuration, reading the layers file when one is set
    pub fn resolve_layers(&self) -> Result<LayerConfig> {
        match &self.layers.value {
            None => Ok(LayerConfig::default()),
            Some(path) => load_layer_config(path),
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        let layers = match &self.layers.value {
            Some(path) => path.display().to_string(),
            None => "(built-in)".to_string(),
        };
        map.insert("layers".to_string(), (layers, self.layers.source));

        map.insert(
            "containment".to_string(),
            (self.containment.value.to_string(), self.containment.source),
        );

        map.insert(
            "join_strategy".to_string(),
            (self.join_strategy.value.to_string(), self.join_strategy.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    layers: Option<PathBuf>,
    containment: Option<String>,
    join_strategy: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub layers: Option<PathBuf>,
    pub containment: Option<ContainmentMode>,
    pub join_strategy: Option<JoinStrategy>,
}

/// Read a layers TOML file
pub fn load_layer_config(path: &Path) -> Result<LayerConfig> {
    let content = fs::read_to_string(path).map_err(|e| SynergyError::ConfigInvalid {
        key: "layers".to_string(),
        reason: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let layers: LayerConfig = toml::from_str(&content).map_err(|e| SynergyError::ConfigInvalid {
        key: "layers".to_string(),
        reason: format!("Failed to parse {}: {}", path.display(), e),
    })?;

    if layers.targets.is_empty() {
        return Err(SynergyError::ConfigMissing { key: "target".to_string() });
    }

    Ok(layers)
}

/// Parse containment mode from string
pub fn parse_containment_mode(s: &str) -> Result<ContainmentMode> {
    match s.to_lowercase().as_str() {
        "whole" => Ok(ContainmentMode::Whole),
        "centroid" => Ok(ContainmentMode::Centroid),
        "points-only" | "points_only" | "points" => Ok(ContainmentMode::PointsOnly),
        _ => Err(SynergyError::ConfigInvalid {
            key: "containment".to_string(),
            reason: format!("Invalid containment mode: {}. Use whole, centroid, or points-only", s),
        }),
    }
}

/// Parse join strategy from string
pub fn parse_join_strategy(s: &str) -> Result<JoinStrategy> {
    match s.to_lowercase().as_str() {
        "full-scan" | "full_scan" | "scan" => Ok(JoinStrategy::FullScan),
        "rtree" | "r-tree" => Ok(JoinStrategy::RTree),
        _ => Err(SynergyError::ConfigInvalid {
            key: "join_strategy".to_string(),
            reason: format!("Invalid join strategy: {}. Use full-scan or rtree", s),
        }),
    }
}
