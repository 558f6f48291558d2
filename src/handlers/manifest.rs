use anyhow::Result;
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use vodgrab::catalog::normalize;
use vodgrab::{CatalogClient, ConfigManager, write_manifest};

pub async fn handle_manifest(
    config_manager: &ConfigManager,
    category: Option<String>,
    output: Option<String>,
) -> Result<()> {
    let term = Term::stdout();
    let config = config_manager.config();
    let category_id = super::resolve_category(config, category)?;
    let manifest_path =
        PathBuf::from(output.unwrap_or_else(|| config.archive.manifest_file.clone()));

    let client = CatalogClient::new(&config.provider)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Fetching category {}...", category_id));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut items = client.fetch_category(&category_id).await;

    spinner.finish_and_clear();

    if items.is_empty() {
        term.write_line(&format!(
            "{} No items found in category {}, nothing to write",
            style("📭").cyan(),
            style(&category_id).cyan()
        ))?;
        return Ok(());
    }

    normalize::normalize(&mut items, &client, &config.archive.name_filter);
    write_manifest(&items, &manifest_path)?;

    term.write_line(&format!(
        "{} Wrote {} entries to {}",
        style("📄").cyan(),
        style(items.len()).cyan().bold(),
        style(manifest_path.display()).cyan()
    ))?;

    Ok(())
}
