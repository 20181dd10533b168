use console::style;
use std::fmt;
use synergy_core::SynergyError;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for missing dataset
pub fn dataset_not_found(location: &str) -> CliError {
    CliError::new("Dataset file not found")
        .with_context(format!("A dataset named in the layers file does not exist.\n\nPath: {}", location))
        .with_suggestion("Check the `file` entries in your layers file")
        .with_suggestion("Relative paths resolve against the layers file directory, or --data-dir")
        .with_help("Run: synergy analyze --help")
}

/// Create error for a dataset that is not a feature collection
pub fn invalid_dataset(origin: &str, reason: &str) -> CliError {
    CliError::new("Invalid dataset")
        .with_context(format!("The dataset could not be read as a GeoJSON feature collection.\n\nFile: {}\nReason: {}", origin, reason))
        .with_suggestion("Ensure the file has a `type` member and a `features` array")
        .with_help("Run: synergy analyze --help")
}

/// Create error for target layers that do not line up with their datasets
pub fn misaligned_layers(datasets: usize, configs: usize) -> CliError {
    CliError::new("Target layers are misaligned")
        .with_context(format!(
            "Loaded {} target datasets but found {} grouping configurations.",
            datasets, configs
        ))
        .with_suggestion("Declare exactly one [[target]] table per target dataset")
        .with_help("Run: synergy config")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check synergy.toml and your layers file for syntax errors")
        .with_suggestion("Check SYNERGY_* environment variables")
        .with_help("Run: synergy config")
}

/// Create error for missing configuration
pub fn missing_config(key: &str) -> CliError {
    CliError::new(format!("Missing configuration: {}", key))
        .with_context("The layers file must declare a [reference] table and at least one [[target]] table.")
        .with_suggestion("Add a [[target]] table with `name`, `file` and `group_by_fields`")
        .with_help("Run: synergy config")
}

/// Convert a domain error to CliError with suggestions
pub fn from_synergy(error: &SynergyError) -> CliError {
    match error {
        SynergyError::DatasetNotFound { location } => dataset_not_found(location),
        SynergyError::DataFormat { origin, reason } => invalid_dataset(origin, reason),
        SynergyError::ConfigurationMismatch { datasets, configs } => {
            misaligned_layers(*datasets, *configs)
        }
        SynergyError::ConfigInvalid { key, reason } => invalid_config(key, reason),
        SynergyError::ConfigMissing { key } => missing_config(key),
        other => CliError::new(other.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(domain) = error.downcast_ref::<SynergyError>() {
        return from_synergy(domain);
    }

    let message = error.to_string();
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {:#}", error))
            .with_suggestion("Check the file path and try again")
    } else if message.to_lowercase().contains("permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {:#}", error))
            .with_suggestion("Check file permissions")
    } else {
        CliError::new(format!("{:#}", error))
    }
}
