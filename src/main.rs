mod cli;
mod handlers;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::process;
use vodgrab::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Validate CLI arguments first
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Initialize logging based on verbosity
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let mut config_manager = match &args.config {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };

    // Validate config on startup (unless we're about to fix it)
    let skip_config_validation = handlers::should_skip_config_validation(&args.command);

    if !skip_config_validation {
        if let Err(e) = config_manager.validate() {
            eprintln!("Configuration validation failed: {}", e);
            eprintln!("Run 'vodgrab config set <key> <value>' to fill in provider settings");
            eprintln!("Or run 'vodgrab config show' to inspect the current configuration");
            process::exit(1);
        }
    }

    // Handle commands
    match args.command {
        Commands::List {
            category,
            detailed,
            limit,
        } => {
            handlers::handle_list(&config_manager, category, detailed, limit).await?;
        }
        Commands::Download {
            category,
            output_dir,
            max_attempts,
            filter,
            manifest,
            no_manifest,
            yes,
        } => {
            handlers::handle_download(
                &config_manager,
                category,
                output_dir,
                max_attempts,
                filter,
                manifest,
                no_manifest,
                yes,
            )
            .await?;
        }
        Commands::Manifest { category, output } => {
            handlers::handle_manifest(&config_manager, category, output).await?;
        }
        Commands::Config { action } => {
            handlers::handle_config(&mut config_manager, action).await?;
        }
    }

    Ok(())
}
