use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vodgrab")]
#[command(about = "Archive VOD categories from Xtream-compatible providers")]
#[command(long_about = "
vodgrab is a command-line tool for archiving video-on-demand categories from
Xtream-compatible providers. It fetches the catalog for a category, derives
download links with filesystem-safe names, writes an audit manifest, and
downloads each file sequentially with resumable, retrying transfers.

Examples:
  vodgrab list --category 42            # Show what a category contains
  vodgrab download                      # Archive the configured category
  vodgrab download --category 42 --yes  # Archive without the confirmation prompt
  vodgrab manifest --category 42        # Only write the name/link manifest
  vodgrab config set provider.base_url http://provider.example.com
")]
#[command(version)]
pub struct Cli {
    /// Override config file path
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the items of a VOD category
    #[command(visible_alias = "ls")]
    List {
        /// Category to list (defaults to archive.category_id from config)
        #[arg(short = 'C', long, value_name = "ID")]
        category: Option<String>,

        /// Show stream ids and container extensions
        #[arg(short, long)]
        #[arg(help = "Show stream ids and container extensions")]
        detailed: bool,

        /// Maximum number of items to print
        #[arg(short, long, default_value = "50", value_name = "N")]
        #[arg(help = "Maximum number of items to print")]
        limit: usize,
    },

    /// Download every item of a category, skipping existing files
    #[command(visible_alias = "dl")]
    Download {
        /// Category to archive (defaults to archive.category_id from config)
        #[arg(short = 'C', long, value_name = "ID")]
        category: Option<String>,

        /// Download directory override
        #[arg(short, long, value_name = "DIR")]
        #[arg(help = "Download to specific directory")]
        output_dir: Option<String>,

        /// Attempts per item before giving up on it
        #[arg(short, long, value_name = "N")]
        #[arg(help = "Attempts per item before giving up on it")]
        max_attempts: Option<u32>,

        /// Name prefix to strip during sanitization
        #[arg(short, long, value_name = "PREFIX")]
        #[arg(help = "Name prefix to strip during sanitization")]
        filter: Option<String>,

        /// Manifest file path override
        #[arg(long, value_name = "FILE")]
        #[arg(help = "Write the name/link manifest to this file")]
        manifest: Option<String>,

        /// Skip writing the manifest file
        #[arg(long)]
        #[arg(help = "Skip writing the manifest file")]
        no_manifest: bool,

        /// Skip confirmation prompt
        #[arg(short, long)]
        #[arg(help = "Skip confirmation prompt")]
        yes: bool,
    },

    /// Write the name/link manifest without downloading anything
    Manifest {
        /// Category to list (defaults to archive.category_id from config)
        #[arg(short = 'C', long, value_name = "ID")]
        category: Option<String>,

        /// Output file (defaults to archive.manifest_file from config)
        #[arg(short, long, value_name = "FILE")]
        output: Option<String>,
    },

    /// Manage configuration
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Show only specific section
        #[arg(short, long, value_name = "SECTION")]
        #[arg(help = "Show only specific section (provider, archive)")]
        section: Option<String>,
    },

    /// Print the config file path
    Path,

    /// Create a sample configuration file
    Sample,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., provider.base_url)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Validate configuration
    #[command(visible_alias = "check")]
    Validate,
}

// Helper functions for CLI validation and parsing
impl Cli {
    /// Validate CLI arguments and show helpful error messages
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Commands::List {
                category, limit, ..
            } => {
                if matches!(category.as_deref(), Some("")) {
                    return Err("Category id cannot be empty".to_string());
                }
                if *limit == 0 {
                    return Err("Limit must be greater than 0".to_string());
                }
            }
            Commands::Download {
                category,
                max_attempts,
                ..
            } => {
                if matches!(category.as_deref(), Some("")) {
                    return Err("Category id cannot be empty".to_string());
                }
                if *max_attempts == Some(0) {
                    return Err("Max attempts must be greater than 0".to_string());
                }
            }
            Commands::Manifest { category, .. } => {
                if matches!(category.as_deref(), Some("")) {
                    return Err("Category id cannot be empty".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Get the category override from commands that take one
    pub fn category_override(&self) -> Option<&str> {
        match &self.command {
            Commands::List { category, .. }
            | Commands::Download { category, .. }
            | Commands::Manifest { category, .. } => category.as_deref(),
            Commands::Config { .. } => None,
        }
    }

    /// Check if command talks to the provider API
    pub fn requires_network(&self) -> bool {
        !matches!(self.command, Commands::Config { .. })
    }
}
