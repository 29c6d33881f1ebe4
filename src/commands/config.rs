//! `config show`: display the effective view configuration.

use owo_colors::OwoColorize;
use serde_json::json;

use super::print_json;
use crate::config::{CollectionKind, ViewConfig};
use crate::error::Result;

/// Show the preset for `kind` merged with the config file, if any
pub fn cmd_config_show(kind: Option<CollectionKind>, as_json: bool) -> Result<()> {
    let path = ViewConfig::config_path();
    let config = ViewConfig::load(kind)?;

    if as_json {
        return print_json(&json!({
            "config_file": path.to_string_lossy(),
            "config_file_exists": path.exists(),
            "config": serde_json::to_value(&config)?,
        }));
    }

    println!("{}\n", "Configuration:".cyan().bold());
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using {} preset)", path.display(), config.kind)
    };
    println!("{}: {}", "config_file".cyan(), source);
    print!("{}", serde_yaml_ng::to_string(&config)?);
    Ok(())
}
