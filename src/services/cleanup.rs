//! Cleanup service for deleting stale temporary upload files.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info, warn};

use crate::error::AppError;

/// Configuration for the cleanup service.
#[derive(Clone)]
pub struct CleanupConfig {
    /// Directory where uploaded files are staged
    pub tmp_dir: PathBuf,
    /// File retention period in hours
    pub retention_hours: u64,
    /// How often to run cleanup (in seconds)
    pub interval_secs: u64,
}

/// Start the cleanup background task.
///
/// Spawns a tokio task that periodically deletes staged upload files that
/// have exceeded the retention period. Files for in-flight imports are
/// normally removed by the worker; this sweeper catches anything orphaned
/// by a crash or an abandoned upload.
pub fn start_cleanup_task(config: CleanupConfig) {
    tokio::spawn(async move {
        info!(
            "Starting cleanup service (retention: {} hours, interval: {} seconds)",
            config.retention_hours, config.interval_secs
        );

        let mut ticker = interval(Duration::from_secs(config.interval_secs));

        loop {
            ticker.tick().await;

            if let Err(e) = run_cleanup(&config).await {
                error!("Cleanup task error: {}", e);
            }
        }
    });
}

/// Run a single cleanup cycle.
async fn run_cleanup(config: &CleanupConfig) -> Result<(), AppError> {
    let retention = Duration::from_secs(config.retention_hours * 3600);
    let now = std::time::SystemTime::now();

    let mut entries = match tokio::fs::read_dir(&config.tmp_dir).await {
        Ok(entries) => entries,
        // Nothing staged yet; the directory is created on first upload.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(AppError::FileSystem(e.to_string())),
    };

    let mut deleted_count = 0;
    let mut error_count = 0;

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read tmp dir entry: {}", e);
                break;
            }
        };
        let path = entry.path();

        let metadata = match entry.metadata().await {
            Ok(m) => m,
            Err(e) => {
                warn!("Failed to stat {}: {}", path.display(), e);
                error_count += 1;
                continue;
            }
        };

        if !metadata.is_file() {
            continue;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());

        let Some(age) = age else { continue };
        if age < retention {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted stale upload file {}", path.display());
                deleted_count += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Failed to delete {}: {}", path.display(), e);
                error_count += 1;
            }
        }
    }

    if deleted_count > 0 || error_count > 0 {
        info!(
            "Stale upload cleanup: {} deleted, {} errors",
            deleted_count, error_count
        );
    }

    Ok(())
}
