use crate::cli::ConfigAction;
use anyhow::{Context, Result};
use console::{Term, style};
use std::process;
use vodgrab::config::ConfigManager;

pub async fn handle_config(config_manager: &mut ConfigManager, action: ConfigAction) -> Result<()> {
    let term = Term::stdout();

    match action {
        ConfigAction::Show { section } => {
            match section.as_deref() {
                Some("provider") => {
                    term.write_line(&format!("{} Provider configuration:", style("🌐").cyan()))?;
                    term.write_line("")?;
                    term.write_line(&toml::to_string_pretty(&config_manager.config().provider)?)?;
                }
                Some("archive") => {
                    term.write_line(&format!("{} Archive configuration:", style("📦").cyan()))?;
                    term.write_line("")?;
                    term.write_line(&toml::to_string_pretty(&config_manager.config().archive)?)?;
                }
                Some(s) => {
                    term.write_line(&format!("{} Unknown section: {}", style("❌").red(), s))?;
                    process::exit(1);
                }
                None => {
                    term.write_line(&format!("{} Current configuration:", style("⚙️").cyan()))?;
                    term.write_line("")?;
                    let config_content =
                        std::fs::read_to_string(config_manager.config_file())
                            .context("Failed to read config file")?;
                    term.write_line(&config_content)?;
                }
            }
        }

        ConfigAction::Path => {
            term.write_line(&format!(
                "{} Config file location: {:?}",
                style("📝").cyan(),
                config_manager.config_file()
            ))?;
        }

        ConfigAction::Sample => {
            let sample_file = config_manager.create_sample_config()?;
            term.write_line(&format!(
                "{} Sample configuration created at: {:?}",
                style("✅").green(),
                sample_file
            ))?;
        }

        ConfigAction::Set { key, value } => {
            set_config_value(config_manager, &key, &value)?;
            config_manager.save()?;

            term.write_line(&format!(
                "{} Set {} = {}",
                style("🔧").cyan(),
                style(&key).cyan(),
                style(&value).green()
            ))?;
            term.write_line(&format!(
                "{} Run 'vodgrab config validate' to check for issues",
                style("💡").yellow()
            ))?;
        }

        ConfigAction::Validate => {
            term.write_line(&format!(
                "{} Validating configuration...",
                style("🔍").cyan()
            ))?;

            match config_manager.validate() {
                Ok(()) => {
                    term.write_line(&format!("{} Configuration is valid", style("✅").green()))?;
                }
                Err(e) => {
                    term.write_line(&format!(
                        "{} Configuration validation failed:",
                        style("❌").red()
                    ))?;
                    term.write_line(&format!("   {}", e))?;
                    process::exit(1);
                }
            }
        }
    }
    Ok(())
}

fn set_config_value(config_manager: &mut ConfigManager, key: &str, value: &str) -> Result<()> {
    let config = config_manager.config_mut();

    match key {
        "provider.base_url" => config.provider.base_url = value.to_string(),
        "provider.username" => config.provider.username = value.to_string(),
        "provider.password" => config.provider.password = value.to_string(),
        "archive.category_id" => config.archive.category_id = value.to_string(),
        "archive.output_dir" => config.archive.output_dir = value.to_string(),
        "archive.name_filter" => config.archive.name_filter = value.to_string(),
        "archive.manifest_file" => config.archive.manifest_file = value.to_string(),
        "archive.max_attempts" => {
            config.archive.max_attempts = value
                .parse()
                .context("archive.max_attempts must be a positive integer")?;
        }
        _ => anyhow::bail!("unknown configuration key: {}", key),
    }

    Ok(())
}
