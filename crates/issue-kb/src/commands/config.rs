use crate::cli::{ConfigCommands, OutputFormat};
use crate::config::{config_paths, Config};
use anyhow::Result;
use std::path::Path;

pub fn handle_config(
    action: &ConfigCommands,
    explicit: Option<&Path>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let redacted = config.redacted();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&redacted)?),
                OutputFormat::Text => print!("{}", toml::to_string(&redacted)?),
            }
        }
        ConfigCommands::Path => {
            let paths = config_paths(explicit);
            match format {
                OutputFormat::Json => {
                    let entries: Vec<_> = paths
                        .iter()
                        .map(|p| {
                            serde_json::json!({
                                "path": p.display().to_string(),
                                "exists": p.exists(),
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                OutputFormat::Text => {
                    for path in paths {
                        let marker = if path.exists() { "found" } else { "missing" };
                        println!("{} ({})", path.display(), marker);
                    }
                }
            }
        }
    }
    Ok(())
}
