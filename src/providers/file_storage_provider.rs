use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::ApplicationSettings;
use crate::errors::internal::{StorageError, ValidationError};
use crate::errors::InternalError;

/// A validated upload, before anything touches the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    /// Sanitized original file name, shown on download
    pub filename: String,
    /// Lowercased extension without the dot
    pub extension: String,
}

/// Files under the managed upload directory
///
/// Stored names are `<uuid-v4>.<ext>`; client-supplied names never reach
/// the file system.
pub struct FileStorageProvider {
    upload_dir: PathBuf,
    max_upload_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl FileStorageProvider {
    pub fn new(settings: &ApplicationSettings) -> Self {
        Self {
            upload_dir: settings.upload_dir().to_path_buf(),
            max_upload_bytes: settings.max_upload_bytes(),
            allowed_extensions: settings.allowed_extensions().to_vec(),
        }
    }

    pub async fn ensure_upload_dir(&self) -> Result<(), InternalError> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| StorageError::io("create_upload_dir", &self.upload_dir, e))?;
        Ok(())
    }

    /// Check the file name and extension
    pub fn check_file_name(&self, original_name: Option<&str>) -> Result<UploadCandidate, InternalError> {
        let original_name = original_name.map(str::trim).filter(|n| !n.is_empty());
        let Some(original_name) = original_name else {
            return Err(ValidationError::MissingField { field: "file" }.into());
        };

        let filename = Self::sanitize_filename(original_name);
        let extension = Self::extension_of(&filename).unwrap_or_default();

        if extension.is_empty() || !self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            return Err(ValidationError::DisallowedExtension {
                extension,
                allowed: self.allowed_extensions.join(", "),
            }
            .into());
        }

        Ok(UploadCandidate { filename, extension })
    }

    /// Check the byte count against emptiness and the configured maximum
    pub fn check_size(&self, size: usize) -> Result<(), InternalError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile.into());
        }
        let max = usize::try_from(self.max_upload_bytes).unwrap_or(usize::MAX);
        if size > max {
            return Err(ValidationError::FileTooLarge { size, max }.into());
        }
        Ok(())
    }

    /// Keep the final path component and replace anything outside `[A-Za-z0-9._-]`
    pub fn sanitize_filename(original_name: &str) -> String {
        let base = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();

        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let cleaned = cleaned.trim_start_matches('.').to_string();
        if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
            "file".to_string()
        } else {
            cleaned
        }
    }

    /// Lowercased text after the last dot
    pub fn extension_of(filename: &str) -> Option<String> {
        let (stem, extension) = filename.rsplit_once('.')?;
        if stem.is_empty() || extension.is_empty() {
            return None;
        }
        Some(extension.to_lowercase())
    }

    /// Write to a hidden temporary file, flush, then rename to `<uuid>.<ext>`
    pub async fn store(&self, extension: &str, data: &[u8]) -> Result<PathBuf, InternalError> {
        self.ensure_upload_dir().await?;

        let id = Uuid::new_v4();
        let temp_path = self.upload_dir.join(format!(".{}.part", id));
        let final_path = self.upload_dir.join(format!("{}.{}", id, extension));

        if let Err(e) = Self::write_file(&temp_path, data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::io("rename_upload", &final_path, e).into());
        }

        tracing::debug!("Stored upload at {}", final_path.display());
        Ok(final_path)
    }

    async fn write_file(path: &Path, data: &[u8]) -> Result<(), InternalError> {
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| StorageError::io("create_upload", path, e))?;
        file.write_all(data)
            .await
            .map_err(|e| StorageError::io("write_upload", path, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io("flush_upload", path, e))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::io("sync_upload", path, e))?;
        Ok(())
    }

    pub async fn read(&self, filepath: &str) -> Result<Vec<u8>, InternalError> {
        let path = self.managed_path(filepath)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| StorageError::io("read_upload", path, e).into())
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, filepath: &str) -> Result<(), InternalError> {
        let path = self.managed_path(filepath)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Stored file already missing: {}", path.display());
                Ok(())
            }
            Err(e) => Err(StorageError::io("remove_upload", path, e).into()),
        }
    }

    /// Resolve a stored path, refusing anything outside the upload directory
    fn managed_path(&self, filepath: &str) -> Result<PathBuf, InternalError> {
        let path = PathBuf::from(filepath);
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) if parent == self.upload_dir.as_path() => Ok(self.upload_dir.join(name)),
            _ => Err(StorageError::OutsideUploadDir { path }.into()),
        }
    }
}
