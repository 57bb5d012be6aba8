use crate::cli::parser::Commands;
use crate::config::{Config, check};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check: check_fields,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        if *check_fields {
            if !path.exists() {
                warning(format!("No configuration file at {}", path.display()));
            } else {
                let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
                let missing = check::missing_fields(&content)?;
                if missing.is_empty() {
                    success("Configuration file is complete.");
                } else {
                    warning(format!("Missing fields: {}", missing.join(", ")));
                    info("Run `hivetime config --migrate` to add them with default values.");
                }
            }
        }

        if *migrate {
            if !path.exists() {
                warning(format!("No configuration file at {}", path.display()));
            } else {
                let added = check::migrate_file(&path)?;
                if added.is_empty() {
                    info("Nothing to migrate.");
                } else {
                    success(format!("Added fields: {}", added.join(", ")));
                }
            }
        }

        if *edit_config {
            let default_editor = std::env::var("EDITOR")
                .or_else(|_| std::env::var("VISUAL"))
                .unwrap_or_else(|_| {
                    if cfg!(target_os = "windows") {
                        "notepad".to_string()
                    } else {
                        "nano".to_string()
                    }
                });
            let editor_to_use = editor.clone().unwrap_or_else(|| default_editor.clone());

            let edited = Command::new(&editor_to_use)
                .arg(&path)
                .status()
                .map(|s| s.success())
                .unwrap_or(false);

            if edited {
                success(format!("Configuration file edited using '{}'", editor_to_use));
            } else if editor_to_use != default_editor {
                warning(format!(
                    "Editor '{}' not available, falling back to '{}'",
                    editor_to_use, default_editor
                ));
                let status = Command::new(&default_editor)
                    .arg(&path)
                    .status()
                    .map_err(|e| AppError::Config(format!("cannot run '{}': {}", default_editor, e)))?;
                if !status.success() {
                    return Err(AppError::Config(format!("editor '{}' failed", default_editor)));
                }
                success(format!("Configuration file edited using fallback '{}'", default_editor));
            } else {
                return Err(AppError::Config(format!("editor '{}' failed", editor_to_use)));
            }
        }
    }

    Ok(())
}
