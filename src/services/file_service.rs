//! Transient file storage for uploaded spreadsheets.
//!
//! All uploads live under one configured tmp directory. The delete path
//! refuses anything outside that directory, so a bad path coming from task
//! state can never escape into the rest of the filesystem.

use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Manages the transient upload directory.
#[derive(Clone)]
pub struct FileService {
    tmp_dir: PathBuf,
}

impl FileService {
    pub fn new(tmp_dir: PathBuf) -> Self {
        Self { tmp_dir }
    }

    /// Create the tmp directory if it does not exist yet.
    pub async fn ensure_tmp_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.tmp_dir)
            .await
            .map_err(|e| AppError::FileSystem(format!("Failed to create tmp directory: {}", e)))?;
        Ok(())
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// Path where the spreadsheet for a task is stored.
    pub fn upload_path(&self, task_id: Uuid) -> PathBuf {
        self.tmp_dir.join(format!("{}.xlsx", task_id))
    }

    /// Verify the file is present before processing starts.
    pub async fn is_file_present(&self, path: &Path) -> AppResult<()> {
        self.ensure_within_tmp(path)?;
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(AppError::FileSystem(format!(
                "{} is not a regular file",
                path.display()
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File {}", path.display())))
            }
            Err(e) => Err(AppError::FileSystem(format!(
                "Failed to stat {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Delete a transient file once processing completes or fails.
    ///
    /// Fails loudly with InvalidInput for any path outside the tmp directory
    /// and with NotFound when the file is already gone. Nothing is deleted in
    /// either error case.
    pub async fn delete(&self, path: &Path) -> AppResult<()> {
        self.ensure_within_tmp(path)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File {}", path.display())))
            }
            Err(e) => Err(AppError::FileSystem(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Reject relative paths, parent-dir components and anything not under
    /// the tmp directory.
    fn ensure_within_tmp(&self, path: &Path) -> AppResult<()> {
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::CurDir))
        {
            return Err(AppError::InvalidInput(format!(
                "Path {} contains traversal components",
                path.display()
            )));
        }
        if !path.starts_with(&self.tmp_dir) {
            return Err(AppError::InvalidInput(format!(
                "Path {} is outside the tmp directory {}",
                path.display(),
                self.tmp_dir.display()
            )));
        }
        Ok(())
    }
}
