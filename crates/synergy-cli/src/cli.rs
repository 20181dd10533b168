use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use synergy_core::export::ExportKind;
use synergy_core::models::{ContainmentMode, JoinStrategy};

/// Synergy - Spatial join of project boundaries against infrastructure assets
#[derive(Parser, Debug)]
#[command(name = "synergy")]
#[command(about = "Spatial join of project boundaries against infrastructure assets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./synergy.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match reference features against every target dataset
    Analyze(AnalyzeArgs),

    /// Run the analysis and write a CSV report
    Export(ExportArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

/// Options shared by every command that runs the join
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Layers file describing the reference and target datasets
    #[arg(long, value_name = "FILE")]
    pub layers: Option<PathBuf>,

    /// How non-point targets are tested
    #[arg(long, value_enum)]
    pub containment: Option<ContainmentArg>,

    /// Candidate selection strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Directory that relative dataset paths are resolved against
    /// (defaults to the directory of the layers file)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Write the full analysis result as JSON
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write map layers (tagged references and matched targets) as GeoJSON
    #[arg(long, value_name = "DIR")]
    pub geojson_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Report to produce
    #[arg(value_enum)]
    pub report: ReportArg,

    #[command(flatten)]
    pub run: RunArgs,

    /// Output file (defaults to a dated name in the current directory)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Omit project manager columns
    #[arg(long)]
    pub no_contacts: bool,

    /// Omit infrastructure impact columns
    #[arg(long)]
    pub no_impact: bool,

    /// Omit construction cost column
    #[arg(long)]
    pub no_cost: bool,
}

/// Containment mode selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContainmentArg {
    /// Whole geometry must lie inside the reference
    Whole,
    /// Non-point geometries are tested by their centroid
    Centroid,
    /// Only point targets can match
    PointsOnly,
}

impl From<ContainmentArg> for ContainmentMode {
    fn from(arg: ContainmentArg) -> Self {
        match arg {
            ContainmentArg::Whole => ContainmentMode::Whole,
            ContainmentArg::Centroid => ContainmentMode::Centroid,
            ContainmentArg::PointsOnly => ContainmentMode::PointsOnly,
        }
    }
}

/// Join strategy selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Test every target against every reference
    FullScan,
    /// Prefilter targets with an R-tree
    Rtree,
}

impl From<StrategyArg> for JoinStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::FullScan => JoinStrategy::FullScan,
            StrategyArg::Rtree => JoinStrategy::RTree,
        }
    }
}

/// CSV report selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportArg {
    /// One row per matched project
    Projects,
    /// Unique project managers
    Contacts,
    /// Affected infrastructure by category
    Infrastructure,
}

impl From<ReportArg> for ExportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Projects => ExportKind::ProjectAnalysis,
            ReportArg::Contacts => ExportKind::ContactList,
            ReportArg::Infrastructure => ExportKind::InfrastructureSummary,
        }
    }
}
