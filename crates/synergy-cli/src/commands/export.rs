//! Export command implementation

use crate::cli::ExportArgs;
use crate::config_loader::{load_config_with_overrides, run_analysis};
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::ExportOutput;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use synergy_core::export::{
    default_file_name, write_contact_list, write_infrastructure_summary, write_project_analysis,
    ExportKind, ExportOptions,
};

pub async fn execute(
    args: ExportArgs,
    config_file: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let config = load_config_with_overrides(config_file, &args.run)?;
    let analysis = run_analysis(&config, args.run.data_dir.clone()).await?;

    let kind: ExportKind = args.report.into();
    let path = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_file_name(kind, chrono::Local::now().date_naive())));

    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);

    let matches = &analysis.result.matches;
    let written = match kind {
        ExportKind::ProjectAnalysis => {
            let options = ExportOptions {
                include_contact_info: !args.no_contacts,
                include_infrastructure_impact: !args.no_impact,
                include_cost_data: !args.no_cost,
            };
            write_project_analysis(matches, &analysis.layers, &options, writer)
        }
        ExportKind::ContactList => write_contact_list(matches, &analysis.layers, writer),
        ExportKind::InfrastructureSummary => {
            write_infrastructure_summary(matches, &analysis.layers, writer)
        }
    };
    written.map_err(|e| anyhow::Error::new(errors::from_synergy(&e)))?;

    tracing::info!("Exported {:?} report to {}", kind, path.display());

    if output.is_json() {
        output.result(ExportOutput {
            report: format!("{:?}", kind),
            path: path.display().to_string(),
            matched_references: matches.len(),
        })?;
    } else {
        output.success(format!("Wrote {}", path.display()));
        output.kv("Matched references", matches.len());
        if matches.is_empty() {
            output.info("No references matched; the report only has a header row");
        }
    }

    Ok(())
}
