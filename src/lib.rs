pub mod catalog;
pub mod config;
pub mod download;
pub mod manifest;

// Re-export commonly used types for easier access in tests
pub use catalog::{CatalogClient, VodItem};
pub use config::{Config, ConfigManager};
pub use download::{
    BatchOptions, BatchRunner, BatchStats, DownloadEngine, DownloadError, DownloadProgress,
    DownloadRequest, DownloadTask,
};
pub use manifest::write_manifest;
