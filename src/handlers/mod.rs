pub mod config;
pub mod download;
pub mod list;
pub mod manifest;

use crate::cli::Commands;
use anyhow::Result;
use vodgrab::config::Config;

// Re-export all handlers
pub use config::handle_config;
pub use download::handle_download;
pub use list::handle_list;
pub use manifest::handle_manifest;

/// Check if config validation should be skipped for certain commands
pub fn should_skip_config_validation(command: &Commands) -> bool {
    // Config management must stay reachable while the config is incomplete
    matches!(command, Commands::Config { .. })
}

/// Resolve the category to operate on: CLI override first, config second
pub fn resolve_category(config: &Config, cli_category: Option<String>) -> Result<String> {
    let category = cli_category.unwrap_or_else(|| config.archive.category_id.clone());
    if category.is_empty() {
        anyhow::bail!("no category given and archive.category_id is not configured");
    }
    Ok(category)
}
