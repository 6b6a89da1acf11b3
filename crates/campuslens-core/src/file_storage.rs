//! File storage for uploaded documents.
//!
//! Certificate scans are written below a base directory and served back
//! under a public URL prefix (`/uploads` by default). Storage keys are
//! relative paths such as `certificates/6f1c...e2.pdf`.
//!
//! # Example
//!
//! ```ignore
//! use campuslens_core::file_storage::{FileStorage, LocalFileStorage};
//! use std::path::PathBuf;
//!
//! let storage = LocalFileStorage::new(PathBuf::from("./uploads"), "/uploads".to_string());
//! let key = LocalFileStorage::generate_key("certificates", "scan.PDF", &CERTIFICATE_EXTENSIONS)?;
//! storage.save(&key, &bytes).await?;
//! let url = storage.get_url(&key)?;
//! ```

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use uuid::Uuid;

/// Extensions accepted for certificate uploads.
pub const CERTIFICATE_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Storage backend for uploaded files.
pub trait FileStorage: Send + Sync + fmt::Debug {
    /// Save file content under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Delete a file. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Public URL for a stored key.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;

    /// Reverse of [`FileStorage::get_url`]. Returns `None` for foreign URLs.
    fn key_from_url(&self, url: &str) -> Option<String>;

    /// Largest accepted upload, in bytes.
    fn max_file_size(&self) -> usize;
}

#[derive(Debug)]
pub enum StorageError {
    InvalidFileSize { max_bytes: usize },
    InvalidExtension { received: String, allowed: Vec<String> },
    IoError(std::io::Error),
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileSize { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidExtension { received, allowed } => write!(
                f,
                "File type '{}' not allowed. Allowed types: {}",
                received,
                allowed.join(", ")
            ),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl StorageError {
    /// True for errors caused by the uploaded content rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::IoError(_))
    }
}

/// Stores files on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Builds a unique key `<prefix>/<uuid>.<ext>` after checking the
    /// original file name's extension against `allowed`.
    pub fn generate_key(
        prefix: &str,
        original_name: &str,
        allowed: &[&str],
    ) -> Result<String, StorageError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !allowed.contains(&extension.as_str()) {
            return Err(StorageError::InvalidExtension {
                received: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            });
        }

        Ok(format!("{}/{}.{}", prefix.trim_matches('/'), Uuid::new_v4(), extension))
    }

    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with a separator".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/", self.base_url.trim_end_matches('/'));
        let key = url.strip_prefix(&prefix)?;
        Self::validate_key(key).ok()?;
        Some(key.to_string())
    }

    fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}
