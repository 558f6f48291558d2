use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::DownloadRequest;
use super::engine::{DownloadEngine, DownloadTask};
use super::progress::DownloadProgress;
use crate::catalog::VodItem;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub max_attempts: u32,
}

/// Counts for one orchestrator run. The loop is strictly sequential, so
/// plain counters suffice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    completed: usize,
    skipped: usize,
    failed: usize,
}

impl BatchStats {
    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.completed + self.skipped + self.failed
    }
}

pub struct BatchRunner {
    engine: DownloadEngine,
    options: BatchOptions,
    progress_sender: mpsc::UnboundedSender<DownloadProgress>,
}

impl BatchRunner {
    pub fn new(
        options: BatchOptions,
    ) -> Result<(Self, mpsc::UnboundedReceiver<DownloadProgress>)> {
        let engine = DownloadEngine::new()?;
        Ok(Self::with_engine(engine, options))
    }

    /// Build a runner around an existing engine.
    pub fn with_engine(
        engine: DownloadEngine,
        options: BatchOptions,
    ) -> (Self, mpsc::UnboundedReceiver<DownloadProgress>) {
        let (progress_sender, progress_receiver) = mpsc::unbounded_channel();

        (
            Self {
                engine,
                options,
                progress_sender,
            },
            progress_receiver,
        )
    }

    /// Target file for an item: `<output_dir>/<name>.<container_extension>`.
    pub fn target_path(&self, item: &VodItem) -> PathBuf {
        self.options
            .output_dir
            .join(format!("{}.{}", item.name, item.container_extension))
    }

    /// Download every item in sequence.
    ///
    /// One transfer is in flight at a time: providers allow a single stream
    /// per source IP. Items whose target file already exists are skipped,
    /// and an item that exhausts its attempts is logged and counted while
    /// the batch moves on to the next one.
    pub async fn run(&self, items: &[VodItem]) -> BatchStats {
        let mut stats = BatchStats::default();

        for item in items {
            let target = self.target_path(item);
            let id = download_id(item);

            let Some(url) = item.download_url.clone() else {
                warn!(name = %item.name, "item was never normalized, no download url");
                stats.failed += 1;
                continue;
            };

            if target.exists() {
                // Existence alone is trusted: a partial file left by a
                // killed run is skipped too. The size is logged so such
                // files can be spotted.
                let existing_bytes = std::fs::metadata(&target).map(|m| m.len()).unwrap_or(0);
                debug!(name = %item.name, existing_bytes, "target exists, skipping");

                let _ = self.progress_sender.send(DownloadProgress::Skipped {
                    id,
                    output_path: target,
                    existing_bytes,
                });
                stats.skipped += 1;
                continue;
            }

            let task = DownloadTask {
                id,
                request: DownloadRequest::new(url, target)
                    .with_max_attempts(self.options.max_attempts),
                progress_sender: self.progress_sender.clone(),
            };

            match self.engine.download(task).await {
                Ok(path) => {
                    info!(name = %item.name, path = %path.display(), "download completed");
                    stats.completed += 1;
                }
                Err(e) => {
                    warn!(name = %item.name, error = %e, "download failed, continuing batch");
                    stats.failed += 1;
                }
            }
        }

        info!(
            completed = stats.completed,
            skipped = stats.skipped,
            failed = stats.failed,
            "batch finished"
        );

        stats
    }
}

fn download_id(item: &VodItem) -> String {
    format!(
        "{}_{}",
        item.stream_id,
        &Uuid::new_v4().to_string()[..8]
    )
}
