//! Photo sidecar management.
//!
//! Captured photos arrive as uris into a transient cache. Before an entry is
//! persisted its photo is copied to `<photos-dir>/<entry-id>.jpg`, and that
//! path is what the entry keeps.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fs::FileSystem;

/// File extension of stored photos.
const PHOTO_EXTENSION: &str = "jpg";

/// Copies captured photos into durable storage and removes them again.
#[derive(Debug, Clone)]
pub struct PhotoSidecar {
    fs: Arc<dyn FileSystem>,
    directory: PathBuf,
}

impl PhotoSidecar {
    /// Create a manager storing photos under `directory`.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>, directory: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            directory: directory.into(),
        }
    }

    /// The durable photo directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Durable path for the photo of `entry_id`.
    #[must_use]
    pub fn path_for(&self, entry_id: &str) -> PathBuf {
        self.directory.join(format!("{entry_id}.{PHOTO_EXTENSION}"))
    }

    /// Copy the photo at `source_uri` into durable storage for `entry_id`.
    ///
    /// Returns the durable uri to store on the entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhotoRelocation`] if the directory cannot be created
    /// or the source cannot be copied.
    pub async fn relocate(&self, source_uri: &str, entry_id: &str) -> Result<String> {
        let source = uri_to_path(source_uri);
        let target = self.path_for(entry_id);

        let relocation_error = |source: std::io::Error| Error::PhotoRelocation {
            from: source_uri.to_string(),
            to: target.clone(),
            source,
        };

        if !self.fs.exists(&self.directory).await {
            self.fs
                .create_dir_all(&self.directory)
                .await
                .map_err(relocation_error)?;
        }

        self.fs
            .copy(&source, &target)
            .await
            .map_err(relocation_error)?;

        debug!("Relocated photo {} to {}", source_uri, target.display());
        Ok(target.to_string_lossy().into_owned())
    }

    /// Delete a stored photo. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhotoRemove`] if the file exists but cannot be deleted.
    pub async fn remove(&self, durable_uri: &str) -> Result<()> {
        if durable_uri.is_empty() {
            return Ok(());
        }
        let path = uri_to_path(durable_uri);
        self.fs
            .remove_file(&path)
            .await
            .map_err(|source| Error::PhotoRemove {
                path: path.clone(),
                source,
            })?;
        info!("Removed photo {}", path.display());
        Ok(())
    }
}

/// Strip a `file://` scheme so the uri can be used as a path.
fn uri_to_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}
