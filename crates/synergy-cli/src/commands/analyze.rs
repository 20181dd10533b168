//! Analyze command implementation

use crate::cli::AnalyzeArgs;
use crate::config_loader::{load_config_with_overrides, run_analysis, Analysis};
use crate::output::OutputWriter;
use crate::output_types::{AnalyzeOutput, DatasetSummary};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use synergy_geo::render::{matched_targets, tag_reference_match_counts, to_geojson_collection};
use tabled::Tabled;

pub async fn execute(
    args: AnalyzeArgs,
    config_file: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let config = load_config_with_overrides(config_file, &args.run)?;
    let analysis = run_analysis(&config, args.run.data_dir.clone()).await?;

    let result_file = match &args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&analysis.result)?;
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let geojson_files = match &args.geojson_dir {
        Some(dir) => write_map_layers(&analysis, dir)?,
        None => Vec::new(),
    };

    let datasets: Vec<DatasetSummary> = analysis
        .layers
        .targets
        .iter()
        .enumerate()
        .map(|(i, target)| DatasetSummary {
            name: target.name.clone(),
            feature_count: analysis.target_sizes.get(i).copied().unwrap_or(0),
            match_count: analysis
                .result
                .matches
                .iter()
                .filter_map(|m| m.target_matches.get(i))
                .map(|tm| tm.match_count)
                .sum(),
        })
        .collect();

    let result = &analysis.result;
    if result.diagnostics.skipped_features > 0 {
        output.warning(format!(
            "{} target features could not be evaluated and were treated as outside",
            result.diagnostics.skipped_features
        ));
    }
    if result.diagnostics.invalid_references > 0 {
        output.warning(format!(
            "{} reference features have no usable polygon and were skipped",
            result.diagnostics.invalid_references
        ));
    }

    if output.is_json() {
        output.result(AnalyzeOutput {
            reference_layer: analysis.layers.reference.name.clone(),
            reference_count: analysis.references.len(),
            matched_references: result.matches.len(),
            total_matches: result.total_matches,
            containment: analysis.options.containment.to_string(),
            strategy: analysis.options.strategy.to_string(),
            datasets,
            summary: result.summary.clone(),
            diagnostics: result.diagnostics,
            result_file,
            geojson_files,
        })?;
        return Ok(());
    }

    output.section("Spatial Analysis");
    output.kv("Reference layer", &analysis.layers.reference.name);
    output.kv("References", analysis.references.len());
    output.kv("Matched references", result.matches.len());
    output.kv("Total matches", result.total_matches);
    output.kv("Containment", analysis.options.containment);
    output.kv("Strategy", analysis.options.strategy);

    output.section("Target Datasets");

    #[derive(Tabled)]
    struct DatasetRow {
        #[tabled(rename = "Dataset")]
        name: String,
        #[tabled(rename = "Features")]
        features: usize,
        #[tabled(rename = "Matches")]
        matches: usize,
    }

    output.table(
        datasets
            .into_iter()
            .map(|d| DatasetRow { name: d.name, features: d.feature_count, matches: d.match_count })
            .collect(),
    );

    output.section("Summary");

    #[derive(Tabled)]
    struct GroupRow {
        #[tabled(rename = "Group")]
        group: String,
        #[tabled(rename = "Count")]
        count: usize,
    }

    output.table(
        result
            .summary
            .iter()
            .map(|(key, count)| GroupRow {
                group: if key.segments().is_empty() { "(all)".to_string() } else { key.to_string() },
                count,
            })
            .collect(),
    );

    if let Some(path) = result_file {
        output.success(format!("Wrote analysis result to {}", path));
    }
    if !geojson_files.is_empty() {
        output.success(format!("Wrote {} map layers", geojson_files.len()));
    }
    if result.matches.is_empty() {
        output.info("No target features fall inside any reference feature");
    }

    Ok(())
}

/// File-name-safe form of a layer name
fn slug(name: &str) -> String {
    let mut slug = String::new();
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Write tagged references and one matched-target layer per dataset
fn write_map_layers(analysis: &Analysis, dir: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    let mut write = |path: PathBuf, collection: geojson::FeatureCollection| -> Result<()> {
        fs::write(&path, collection.to_string())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path.display().to_string());
        Ok(())
    };

    let tagged = tag_reference_match_counts(
        &analysis.references,
        &analysis.result,
        &analysis.layers.reference.id_field,
    );
    write(dir.join("references.geojson"), to_geojson_collection(&tagged))?;

    for (i, target) in analysis.layers.targets.iter().enumerate() {
        let name = match slug(&target.name) {
            s if s.is_empty() => format!("target-{}", i + 1),
            s => s,
        };
        let features = matched_targets(&analysis.result, i);
        write(dir.join(format!("matched-{}.geojson", name)), to_geojson_collection(&features))?;
    }

    Ok(written)
}
