use serde::Serialize;
use std::collections::BTreeMap;
use synergy_core::models::{GroupCounts, JoinDiagnostics};

/// Output for analyze command
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub reference_layer: String,
    pub reference_count: usize,
    pub matched_references: usize,
    pub total_matches: usize,
    pub containment: String,
    pub strategy: String,
    pub datasets: Vec<DatasetSummary>,
    pub summary: GroupCounts,
    pub diagnostics: JoinDiagnostics,
    pub result_file: Option<String>,
    pub geojson_files: Vec<String>,
}

/// Per target dataset totals
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub feature_count: usize,
    pub match_count: usize,
}

/// Output for export command
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub report: String,
    pub path: String,
    pub matched_references: usize,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config_file: Option<String>,
    pub values: BTreeMap<String, ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}
