use std::path::PathBuf;
use std::time::Duration;

/// Events emitted on the progress channel while a batch runs.
///
/// Consumers drive display from these; the engine and orchestrator never
/// depend on them being received.
#[derive(Debug, Clone)]
pub enum DownloadProgress {
    Started {
        id: String,
        url: String,
        output_path: PathBuf,
        resume_from: u64,
    },
    Progress {
        id: String,
        bytes_downloaded: u64,
        total_bytes: u64,
        progress_percent: u8,
        speed_bps: u64,
    },
    Retry {
        id: String,
        attempt: u32,
        max_attempts: u32,
        delay: Duration,
    },
    Completed {
        id: String,
        bytes_downloaded: u64,
    },
    Failed {
        id: String,
        error: String,
        attempts: u32,
    },
    Skipped {
        id: String,
        output_path: PathBuf,
        existing_bytes: u64,
    },
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

pub fn format_speed(bytes_per_second: u64) -> String {
    format!("{}/s", format_bytes(bytes_per_second))
}

pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(1_048_576), "1.0 MB");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(1_048_576), "1.0 MB/s");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3700)), "1h 1m 40s");
    }
}
