use anyhow::{Context, Result};
use console::{Term, style};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use vodgrab::catalog::normalize;
use vodgrab::download::progress::{format_bytes, format_duration};
use vodgrab::{
    BatchOptions, BatchRunner, CatalogClient, ConfigManager, DownloadProgress, write_manifest,
};

pub async fn handle_download(
    config_manager: &ConfigManager,
    category: Option<String>,
    output_dir: Option<String>,
    max_attempts: Option<u32>,
    filter: Option<String>,
    manifest: Option<String>,
    no_manifest: bool,
    yes: bool,
) -> Result<()> {
    let term = Term::stdout();
    let config = config_manager.config();
    let category_id = super::resolve_category(config, category)?;
    let output_dir = PathBuf::from(output_dir.unwrap_or_else(|| config.archive.output_dir.clone()));
    let max_attempts = max_attempts.unwrap_or(config.archive.max_attempts);
    let name_filter = filter.unwrap_or_else(|| config.archive.name_filter.clone());

    let client = CatalogClient::new(&config.provider)?;

    term.write_line(&format!(
        "{} Archiving category {}...",
        style("⬇️").cyan(),
        style(&category_id).cyan().bold()
    ))?;

    // Show a spinner while fetching the catalog
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    spinner.set_message("Fetching catalog...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut items = client.fetch_category(&category_id).await;

    spinner.finish_and_clear();

    if items.is_empty() {
        term.write_line(&format!(
            "{} No items found in category {}",
            style("📭").cyan(),
            style(&category_id).cyan()
        ))?;
        return Ok(());
    }

    normalize::normalize(&mut items, &client, &name_filter);

    if !no_manifest {
        let manifest_path =
            PathBuf::from(manifest.unwrap_or_else(|| config.archive.manifest_file.clone()));
        write_manifest(&items, &manifest_path)?;
        term.write_line(&format!(
            "{} Manifest written to {}",
            style("📄").cyan(),
            style(manifest_path.display()).cyan()
        ))?;
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let (runner, mut progress_receiver) = BatchRunner::new(BatchOptions {
        output_dir: output_dir.clone(),
        max_attempts,
    })?;

    let pending = items
        .iter()
        .filter(|item| !runner.target_path(item).exists())
        .count();

    term.write_line(&format!(
        "{} {} items total, {} already on disk, {} to download",
        style("📦").cyan(),
        items.len(),
        items.len() - pending,
        style(pending).cyan().bold()
    ))?;

    if pending == 0 {
        term.write_line(&format!("{} Nothing to do", style("✅").green()))?;
        return Ok(());
    }

    if !yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Download {} items to {}?",
                pending,
                output_dir.display()
            ))
            .default(true)
            .interact()?;

        if !proceed {
            term.write_line(&format!("{} Aborted", style("❌").red()))?;
            return Ok(());
        }
    }

    // Drive the console display from the engine's progress events
    let progress_handle = tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;

        while let Some(event) = progress_receiver.recv().await {
            match event {
                DownloadProgress::Started {
                    output_path,
                    resume_from,
                    ..
                } => {
                    let file_name = output_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();

                    let pb = ProgressBar::new(0);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{elapsed_precise}] [{bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}")
                            .unwrap()
                            .progress_chars("#>-"),
                    );
                    pb.set_message(file_name);
                    if resume_from > 0 {
                        pb.set_position(resume_from);
                    }
                    bar = Some(pb);
                }
                DownloadProgress::Progress {
                    bytes_downloaded,
                    total_bytes,
                    ..
                } => {
                    if let Some(pb) = &bar {
                        if total_bytes > 0 {
                            pb.set_length(total_bytes);
                        }
                        pb.set_position(bytes_downloaded);
                    }
                }
                DownloadProgress::Retry {
                    attempt,
                    max_attempts,
                    ..
                } => {
                    if let Some(pb) = &bar {
                        pb.println(format!(
                            "⚠️  attempt {}/{} failed, retrying...",
                            attempt, max_attempts
                        ));
                    }
                }
                DownloadProgress::Completed {
                    bytes_downloaded, ..
                } => {
                    if let Some(pb) = bar.take() {
                        let name = pb.message();
                        pb.finish_and_clear();
                        println!("✅ {} ({})", name, format_bytes(bytes_downloaded));
                    }
                }
                DownloadProgress::Failed {
                    error, attempts, ..
                } => {
                    if let Some(pb) = bar.take() {
                        let name = pb.message();
                        pb.finish_and_clear();
                        println!("❌ {} failed after {} attempts: {}", name, attempts, error);
                    }
                }
                DownloadProgress::Skipped { output_path, .. } => {
                    println!(
                        "⏭️  Skipping {}, already downloaded",
                        output_path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default()
                    );
                }
            }
        }
    });

    let started = Instant::now();
    let stats = runner.run(&items).await;

    // Closing the runner drops the progress sender, ending the display task
    drop(runner);
    let _ = progress_handle.await;

    term.write_line("")?;
    term.write_line(&format!(
        "{} Batch finished in {}: {} downloaded, {} skipped, {} failed",
        style("🏁").cyan(),
        format_duration(started.elapsed()),
        style(stats.completed()).green().bold(),
        style(stats.skipped()).cyan(),
        if stats.failed() > 0 {
            style(stats.failed()).red().bold()
        } else {
            style(stats.failed()).dim()
        },
    ))?;

    Ok(())
}
