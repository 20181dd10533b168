//! CSV reports built from analysis results
//!
//! Group keys are structured internally; this is the boundary where they are
//! split into report columns or joined into display text.

use chrono::{DateTime, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use std::io::Write;

use crate::error::Result;
use crate::models::{Feature, GroupKey, LayerConfig, PropertyValue, SpatialMatch, UNKNOWN};

const NOT_AVAILABLE: &str = "N/A";
const UNTITLED_PROJECT: &str = "Untitled Project";
const ALL_TYPES: &str = "All Types";

/// Report kinds with their file name prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    ProjectAnalysis,
    ContactList,
    InfrastructureSummary,
}

impl ExportKind {
    fn prefix(&self) -> &'static str {
        match self {
            ExportKind::ProjectAnalysis => "project-analysis",
            ExportKind::ContactList => "project-managers",
            ExportKind::InfrastructureSummary => "infrastructure-impact",
        }
    }
}

/// Dated file name for a report, e.g. `project-analysis-2024-05-01.csv`
pub fn default_file_name(kind: ExportKind, date: NaiveDate) -> String {
    format!("{}-{}.csv", kind.prefix(), date.format("%Y-%m-%d"))
}

/// Column toggles for the project analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub include_contact_info: bool,
    pub include_infrastructure_impact: bool,
    pub include_cost_data: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_contact_info: true,
            include_infrastructure_impact: true,
            include_cost_data: true,
        }
    }
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().quote_style(csv::QuoteStyle::Always).from_writer(writer)
}

/// One row per matched reference feature
pub fn write_project_analysis<W: Write>(
    matches: &[SpatialMatch],
    layers: &LayerConfig,
    options: &ExportOptions,
    writer: W,
) -> Result<()> {
    let display = &layers.reference.display;
    let mut csv = csv_writer(writer);

    let mut headers =
        vec!["Project Title", "Project Number", "Agency/Department", "Start Date", "End Date"];
    if options.include_cost_data {
        headers.push("Construction Cost ($)");
    }
    if options.include_contact_info {
        headers.extend(["Project Manager", "Phone", "Email"]);
    }
    if options.include_infrastructure_impact {
        headers.extend(["Total Infrastructure Items Affected", "Infrastructure Breakdown"]);
    }
    csv.write_record(&headers)?;

    for m in matches {
        let reference = &m.reference_feature;
        let mut row = vec![
            reference.property_or(&display.title, UNTITLED_PROJECT),
            reference.property_or(&display.project_number, NOT_AVAILABLE),
            reference.property_or(&display.department, UNKNOWN),
            format_date(reference, &display.start_date),
            format_date(reference, &display.end_date),
        ];

        if options.include_cost_data {
            row.push(format_cost(reference, &display.cost));
        }

        if options.include_contact_info {
            row.push(reference.property_or(&display.manager_name, NOT_AVAILABLE));
            row.push(reference.property_or(&display.manager_phone, NOT_AVAILABLE));
            row.push(reference.property_or(&display.manager_email, NOT_AVAILABLE));
        }

        if options.include_infrastructure_impact {
            row.push(m.total_match_count.to_string());
            let breakdown = infrastructure_breakdown(m, layers);
            row.push(if breakdown.is_empty() { "None".to_string() } else { breakdown });
        }

        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

/// `group: n; group: n | group: n` across datasets that matched
pub fn infrastructure_breakdown(m: &SpatialMatch, layers: &LayerConfig) -> String {
    m.target_matches
        .iter()
        .enumerate()
        .filter(|(_, tm)| tm.match_count > 0)
        .map(|(index, tm)| {
            tm.grouped_matches
                .iter()
                .map(|(key, count)| format!("{}: {}", group_label(key, layers, index), count))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn group_label(key: &GroupKey, layers: &LayerConfig, index: usize) -> String {
    if is_unclassified(key) {
        layers.target_name(index)
    } else {
        key.to_string()
    }
}

fn is_unclassified(key: &GroupKey) -> bool {
    key.segments().is_empty() || key.is_all_unknown()
}

/// Unique project managers, keyed by name and email, in first-seen order
pub fn write_contact_list<W: Write>(
    matches: &[SpatialMatch],
    layers: &LayerConfig,
    writer: W,
) -> Result<()> {
    let display = &layers.reference.display;
    let mut csv = csv_writer(writer);
    csv.write_record([
        "Project Manager",
        "Phone",
        "Email",
        "Department",
        "Project Title",
        "Project Number",
    ])?;

    let mut seen = HashSet::new();
    for m in matches {
        let reference = &m.reference_feature;
        let (Some(name), Some(email)) = (
            truthy_text(reference, &display.manager_name),
            truthy_text(reference, &display.manager_email),
        ) else {
            continue;
        };

        if !seen.insert(format!("{}-{}", name, email)) {
            continue;
        }

        csv.write_record([
            name,
            reference.property_or(&display.manager_phone, NOT_AVAILABLE),
            email,
            reference.property_or(&display.department, UNKNOWN),
            reference.property_or(&display.title, UNTITLED_PROJECT),
            reference.property_or(&display.project_number, NOT_AVAILABLE),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

#[derive(Debug, Default)]
struct SummaryRow {
    count: usize,
    projects: Vec<String>,
}

/// One row per (target dataset, group key) with affected project titles
pub fn write_infrastructure_summary<W: Write>(
    matches: &[SpatialMatch],
    layers: &LayerConfig,
    writer: W,
) -> Result<()> {
    let title_field = &layers.reference.display.title;
    let mut rows: BTreeMap<(usize, &GroupKey), SummaryRow> = BTreeMap::new();

    for m in matches {
        let title = m.reference_feature.property_or(title_field, UNTITLED_PROJECT);
        for (index, tm) in m.target_matches.iter().enumerate() {
            for (key, count) in tm.grouped_matches.iter() {
                let row = rows.entry((index, key)).or_default();
                row.count += count;
                if !row.projects.contains(&title) {
                    row.projects.push(title.clone());
                }
            }
        }
    }

    let mut csv = csv_writer(writer);
    csv.write_record(["Infrastructure Type", "Subcategory", "Count", "Affected Projects"])?;

    for ((index, key), row) in rows {
        let (kind, subcategory) = if is_unclassified(key) {
            (layers.target_name(index), ALL_TYPES.to_string())
        } else {
            (
                key.segment(0).unwrap_or(UNKNOWN).to_string(),
                key.segment(1).unwrap_or(UNKNOWN).to_string(),
            )
        };

        csv.write_record([kind, subcategory, row.count.to_string(), row.projects.join("; ")])?;
    }

    csv.flush()?;
    Ok(())
}

fn truthy_text(feature: &Feature, field: &str) -> Option<String> {
    feature.property(field).filter(|v| v.is_truthy()).map(PropertyValue::to_string)
}

/// Millisecond timestamps render as `YYYY-MM-DD`; text is passed through
fn format_date(feature: &Feature, field: &str) -> String {
    match feature.property(field) {
        Some(PropertyValue::Number(ms)) if *ms != 0.0 && ms.is_finite() => {
            DateTime::from_timestamp_millis(*ms as i64)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }
        Some(value) if value.is_truthy() => value.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_cost(feature: &Feature, field: &str) -> String {
    match feature.property(field) {
        Some(PropertyValue::Number(n)) if *n != 0.0 && n.is_finite() => {
            format!("${}", group_thousands(*n))
        }
        Some(value) if value.is_truthy() => format!("${}", value),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `1234567.5` -> `1,234,567.5`
fn group_thousands(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = PropertyValue::Number(rounded.abs()).to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
