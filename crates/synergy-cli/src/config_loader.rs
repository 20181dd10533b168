//! Configuration loading and the shared analysis pipeline for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use synergy_core::config::{CliConfigOverrides, LayeredConfig};
use synergy_core::loader::{load_datasets, validate_dataset, FileDatasetSource};
use synergy_core::models::{Feature, LayerConfig, SpatialAnalysisResult};
use synergy_core::SynergyError;
use synergy_geo::{JoinOptions, SpatialJoin};

use crate::cli::RunArgs;
use crate::errors;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "synergy.toml";

/// Resolve which config file applies, if any
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            path.is_file().then_some(path)
        }
    }
}

/// Load layered configuration: defaults, then file, then environment
pub fn load_config(config_file: Option<&Path>) -> Result<LayeredConfig> {
    let config = match config_file_path(config_file) {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(&path)
            .map_err(|e| errors::from_synergy(&e))
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults(),
    };

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(config_file: Option<&Path>, run: &RunArgs) -> Result<LayeredConfig> {
    let mut config = load_config(config_file)?;
    config.update_from_cli(CliConfigOverrides {
        layers: run.layers.clone(),
        containment: run.containment.map(Into::into),
        join_strategy: run.strategy.map(Into::into),
    });
    Ok(config)
}

/// Everything produced by one analysis run
pub struct Analysis {
    pub layers: LayerConfig,
    pub references: Vec<Feature>,
    pub target_sizes: Vec<usize>,
    pub options: JoinOptions,
    pub result: SpatialAnalysisResult,
}

fn domain_error(error: SynergyError) -> anyhow::Error {
    anyhow::Error::new(errors::from_synergy(&error))
}

/// Load every dataset and run the join on a blocking worker
pub async fn run_analysis(config: &LayeredConfig, data_dir: Option<PathBuf>) -> Result<Analysis> {
    let layers = config.resolve_layers().map_err(domain_error)?;

    let root = data_dir.or_else(|| {
        config.layers.value.as_deref().and_then(Path::parent).map(Path::to_path_buf)
    });
    let source = match root {
        Some(root) => FileDatasetSource::with_root(root),
        None => FileDatasetSource::new(),
    };

    let loaded = load_datasets(&source, &layers).await.map_err(domain_error)?;

    if !validate_dataset(&loaded.reference, layers.reference.geometry_type) {
        tracing::warn!(
            "Reference layer '{}' has features that are not {}",
            layers.reference.name,
            layers.reference.geometry_type
        );
    }
    for (target, dataset) in layers.targets.iter().zip(&loaded.targets) {
        if !validate_dataset(dataset, target.geometry_type) {
            tracing::warn!(
                "Target layer '{}' has features that are not {}",
                target.name,
                target.geometry_type
            );
        }
    }

    let options = JoinOptions {
        containment: config.containment.value,
        strategy: config.join_strategy.value,
    };
    let configs = layers.target_configs();
    let target_sizes = loaded.targets.iter().map(|t| t.len()).collect();
    let references = loaded.reference.features;
    let targets = loaded.targets;

    let (references, result) = tokio::task::spawn_blocking(move || {
        let result = SpatialJoin::new(options).join(&references, &targets, &configs);
        (references, result)
    })
    .await
    .context("Spatial join worker failed")?;

    let result = result.map_err(domain_error)?;

    Ok(Analysis { layers, references, target_sizes, options, result })
}
