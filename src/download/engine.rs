use anyhow::{Context, Result, bail};
use futures_util::StreamExt;
use reqwest::{Client, header};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::debug;

use super::DownloadRequest;
use super::error::DownloadError;
use super::progress::DownloadProgress;

const PROGRESS_UPDATE_INTERVAL: Duration = Duration::from_millis(250);

/// Pause between failed attempts.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Redirect hop cap for download URLs.
const MAX_REDIRECT_HOPS: usize = 5;

#[derive(Debug)]
pub struct DownloadTask {
    pub id: String,
    pub request: DownloadRequest,
    pub progress_sender: mpsc::UnboundedSender<DownloadProgress>,
}

pub struct DownloadEngine {
    client: Client,
    retry_delay: Duration,
}

impl DownloadEngine {
    pub fn new() -> Result<Self> {
        // No overall request timeout: a VOD transfer runs for however long
        // the stream takes. Only the connection phase is bounded.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
            .user_agent(concat!("vodgrab/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Override the pause between failed attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Download `task.request.url` to its output path, resuming from any
    /// partial file already on disk and retrying up to `max_attempts`
    /// times. Returns the output path after the first clean attempt.
    pub async fn download(&self, task: DownloadTask) -> Result<PathBuf, DownloadError> {
        let request = &task.request;

        if request.max_attempts == 0 {
            return Err(DownloadError::InvalidAttempts { value: 0 });
        }

        let _ = task.progress_sender.send(DownloadProgress::Started {
            id: task.id.clone(),
            url: request.url.clone(),
            output_path: request.output_path.clone(),
            resume_from: resume_offset(&request.output_path),
        });

        let mut attempt = 0;

        loop {
            attempt += 1;

            // Re-read the offset before every attempt: a failed attempt may
            // have appended bytes before the transport dropped.
            let offset = resume_offset(&request.output_path);

            match self.download_attempt(&task, offset).await {
                Ok(bytes_downloaded) => {
                    let _ = task.progress_sender.send(DownloadProgress::Completed {
                        id: task.id.clone(),
                        bytes_downloaded,
                    });

                    return Ok(request.output_path.clone());
                }
                Err(e) => {
                    debug!(url = %request.url, attempt, error = %e, "download attempt failed");

                    if attempt >= request.max_attempts {
                        let _ = task.progress_sender.send(DownloadProgress::Failed {
                            id: task.id.clone(),
                            error: format!("{e:#}"),
                            attempts: attempt,
                        });

                        return Err(DownloadError::Exhausted {
                            url: request.url.clone(),
                            output_path: request.output_path.clone(),
                            attempts: attempt,
                            last_error: format!("{e:#}"),
                        });
                    }

                    let _ = task.progress_sender.send(DownloadProgress::Retry {
                        id: task.id.clone(),
                        attempt,
                        max_attempts: request.max_attempts,
                        delay: self.retry_delay,
                    });

                    sleep(self.retry_delay).await;
                }
            }
        }
    }

    async fn download_attempt(&self, task: &DownloadTask, offset: u64) -> Result<u64> {
        let request = &task.request;

        // The Range header is sent unconditionally; `bytes=0-` on a fresh
        // file is equivalent to a plain GET on a range-honoring server.
        let response = self
            .client
            .get(&request.url)
            .header(header::RANGE, format!("bytes={}-", offset))
            .send()
            .await
            .context("Failed to send HTTP request")?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP request failed with status: {}", status);
        }

        let total_size = total_size(&response, offset);

        // Append-only: bytes already on disk are never rewritten.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&request.output_path)
            .with_context(|| format!("Failed to open {:?} for append", request.output_path))?;

        let mut downloaded = offset;
        let mut last_progress_update = Instant::now();
        let mut last_bytes = downloaded;

        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.context("Failed to read chunk from response")?;

            file.write_all(&chunk)
                .context("Failed to write chunk to file")?;

            downloaded += chunk.len() as u64;

            // Progress is cosmetic; pacing and delivery never affect the
            // transfer itself.
            if last_progress_update.elapsed() >= PROGRESS_UPDATE_INTERVAL {
                let progress_percent = if total_size > 0 {
                    (downloaded as f64 / total_size as f64 * 100.0) as u8
                } else {
                    0
                };

                let elapsed = last_progress_update.elapsed().as_secs_f64();
                let speed_bps = if elapsed > 0.0 {
                    ((downloaded - last_bytes) as f64 / elapsed) as u64
                } else {
                    0
                };

                let _ = task.progress_sender.send(DownloadProgress::Progress {
                    id: task.id.clone(),
                    bytes_downloaded: downloaded,
                    total_bytes: total_size,
                    progress_percent,
                    speed_bps,
                });

                last_progress_update = Instant::now();
                last_bytes = downloaded;
            }
        }

        file.flush().context("Failed to flush file")?;
        Ok(downloaded)
    }
}

/// Current size of the file at `path`, the authoritative resume offset.
fn resume_offset(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Best-effort total for progress display: the Content-Range total when the
/// server answered a resumed request with 206, otherwise offset plus
/// Content-Length.
fn total_size(response: &reqwest::Response, offset: u64) -> u64 {
    response
        .headers()
        .get(header::CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| {
            // Parse "bytes 1024-2047/2048" format
            s.split('/').nth(1)?.parse().ok()
        })
        .unwrap_or_else(|| offset + response.content_length().unwrap_or(0))
}
