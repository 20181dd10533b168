//! Config command implementation

use crate::config_loader::{config_file_path, load_config};
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;
use tabled::Tabled;

pub fn execute(config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_file)?;
    let file = config_file_path(config_file).map(|p| p.display().to_string());

    // Sort by key for consistent output
    let values: BTreeMap<String, ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| (key, ConfigEntry { value, source: format!("{:?}", source) }))
        .collect();

    if output.is_json() {
        output.result(ConfigOutput { config_file: file, values })?;
        return Ok(());
    }

    output.section("Configuration Values");
    output.kv("Config file", file.as_deref().unwrap_or("(none)"));

    #[derive(Tabled)]
    struct ConfigRow {
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    let rows: Vec<ConfigRow> = values
        .into_iter()
        .map(|(key, entry)| ConfigRow { key, value: entry.value, source: entry.source })
        .collect();
    output.table(rows);

    output.section("Configuration Precedence");
    output.info("CLI arguments > Environment variables > Config file > Defaults");

    Ok(())
}
