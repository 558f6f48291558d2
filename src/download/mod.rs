pub mod batch;
pub mod engine;
pub mod error;
pub mod progress;

pub use batch::{BatchOptions, BatchRunner, BatchStats};
pub use engine::{DownloadEngine, DownloadTask};
pub use error::DownloadError;
pub use progress::DownloadProgress;

use std::path::PathBuf;

/// Default attempt budget per download, including the initial attempt.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub output_path: PathBuf,
    pub max_attempts: u32,
}

impl DownloadRequest {
    pub fn new(url: String, output_path: PathBuf) -> Self {
        Self {
            url,
            output_path,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}
