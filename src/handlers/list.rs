use anyhow::Result;
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use vodgrab::{CatalogClient, ConfigManager};

pub async fn handle_list(
    config_manager: &ConfigManager,
    category: Option<String>,
    detailed: bool,
    limit: usize,
) -> Result<()> {
    let term = Term::stdout();
    let config = config_manager.config();
    let category_id = super::resolve_category(config, category)?;

    let client = CatalogClient::new(&config.provider)?;

    // Show a spinner while fetching the catalog
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Fetching category {}...", category_id));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let items = client.fetch_category(&category_id).await;

    spinner.finish_and_clear();

    if items.is_empty() {
        term.write_line(&format!(
            "{} No items found in category {}",
            style("📭").cyan(),
            style(&category_id).cyan()
        ))?;
        return Ok(());
    }

    term.write_line(&format!(
        "{} {} items in category {}:",
        style("📋").cyan(),
        style(items.len()).cyan().bold(),
        style(&category_id).cyan()
    ))?;

    for item in items.iter().take(limit) {
        if detailed {
            term.write_line(&format!(
                "  🎬 {} (stream {}, .{})",
                style(&item.name).cyan(),
                item.stream_id,
                item.container_extension
            ))?;
        } else {
            term.write_line(&format!("  🎬 {}", item.name))?;
        }
    }

    if items.len() > limit {
        term.write_line(&format!(
            "  … and {} more (raise --limit to see them)",
            items.len() - limit
        ))?;
    }

    Ok(())
}
