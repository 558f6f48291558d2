use std::path::PathBuf;

/// Terminal failures of a download call.
///
/// Per-attempt failures (transport drops, bad statuses, write errors) stay
/// inside the engine's retry loop and only surface here once the attempt
/// budget is spent.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A request must allow at least one attempt.
    #[error("invalid max_attempts value {value}: must be at least 1")]
    InvalidAttempts {
        /// The invalid value that was provided.
        value: u32,
    },

    /// Every attempt failed; nothing more will be tried.
    #[error("failed to download {url} to {} after {attempts} attempts: {last_error}", .output_path.display())]
    Exhausted {
        url: String,
        output_path: PathBuf,
        attempts: u32,
        last_error: String,
    },
}
