//! Local file storage for uploaded images and documents
//!
//! Files live under `{upload_dir}/{bucket}/` and are served back under
//! `/uploads/{bucket}/` by the HTTP layer.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use crate::config::StorageConfig;
use crate::utils::errors::{SocioError, Result};
use crate::utils::helpers::{format_bytes, generate_compact_id, sanitize_filename};

pub const EVENT_IMAGES: &str = "event-images";
pub const EVENT_BANNERS: &str = "event-banners";
pub const EVENT_PDFS: &str = "event-pdfs";
pub const FEST_IMAGES: &str = "fest-images";

/// File received in a multipart request
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A stored upload
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    public_base_url: String,
}

impl FileStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.upload_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload to `bucket` and return its public URL
    pub async fn store(&self, bucket: &str, owner: &str, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        validate_bucket(bucket)?;

        let owner = sanitize_filename(owner);
        let file_name = format!("{}_{}_{}", owner, generate_compact_id(), sanitize_filename(original_name));
        let dir = self.root.join(bucket);

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| SocioError::Storage(format!("Failed to create {}: {}", dir.display(), e)))?;
        tokio::fs::write(dir.join(&file_name), bytes)
            .await
            .map_err(|e| SocioError::Storage(format!("Failed to write {}: {}", file_name, e)))?;

        info!(bucket = bucket, file = %file_name, size = %format_bytes(bytes.len() as u64), "Stored upload");

        Ok(StoredFile {
            url: format!("{}/uploads/{}/{}", self.public_base_url, bucket, file_name),
            path: file_name,
        })
    }

    /// Store an optional upload, returning its public URL
    pub async fn store_upload(&self, bucket: &str, owner: &str, upload: Option<&Upload>) -> Result<Option<String>> {
        match upload {
            Some(upload) => Ok(Some(self.store(bucket, owner, &upload.file_name, &upload.bytes).await?.url)),
            None => Ok(None),
        }
    }

    /// Recover the stored file name from a public URL issued for `bucket`
    pub fn path_from_url(&self, url: &str, bucket: &str) -> Option<String> {
        let marker = format!("/uploads/{}/", bucket);
        let start = url.find(&marker)? + marker.len();
        let path = url[start..]
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default();

        if is_safe_file_name(path) {
            Some(path.to_string())
        } else {
            None
        }
    }

    /// Remove a stored file; a file that is already gone is not an error
    pub async fn delete(&self, path: &str, bucket: &str) -> Result<()> {
        validate_bucket(bucket)?;
        if !is_safe_file_name(path) {
            return Err(SocioError::InvalidInput(format!("Invalid file path: {}", path)));
        }

        match tokio::fs::remove_file(self.root.join(bucket).join(path)).await {
            Ok(()) => {
                debug!(bucket = bucket, file = path, "Deleted stored file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SocioError::Storage(format!("Failed to delete {}: {}", path, e))),
        }
    }

    /// Delete the file behind a public URL, logging instead of failing
    pub async fn remove_url(&self, url: Option<&str>, bucket: &str) {
        let Some(path) = url.and_then(|url| self.path_from_url(url, bucket)) else {
            return;
        };

        if let Err(e) = self.delete(&path, bucket).await {
            warn!(bucket = bucket, file = %path, error = %e, "Failed to remove stored file");
        }
    }
}

pub fn validate_bucket(bucket: &str) -> Result<()> {
    let valid = !bucket.is_empty()
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(SocioError::InvalidInput(format!("Invalid bucket name: {}", bucket)))
    }
}

fn is_safe_file_name(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('.')
        && !path.contains(['/', '\\'])
        && !path.contains("..")
}
