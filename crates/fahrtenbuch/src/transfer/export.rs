//! CSV export.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::share::{ShareSurface, CSV_MIME_TYPE};
use crate::store::EntryStore;

use super::format;

/// Prefix of exported file names.
const EXPORT_FILE_PREFIX: &str = "fahrtenbuch";

/// Writes the logbook to a dated CSV file and shares it.
#[derive(Debug, Clone)]
pub struct Exporter {
    store: EntryStore,
    fs: Arc<dyn FileSystem>,
    share: Arc<dyn ShareSurface>,
    backup_directory: PathBuf,
}

impl Exporter {
    /// Create an exporter writing into `backup_directory`.
    #[must_use]
    pub fn new(
        store: EntryStore,
        fs: Arc<dyn FileSystem>,
        share: Arc<dyn ShareSurface>,
        backup_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            fs,
            share,
            backup_directory: backup_directory.into(),
        }
    }

    /// Directory export files are written to.
    #[must_use]
    pub fn backup_directory(&self) -> &Path {
        &self.backup_directory
    }

    /// Export all entries, naming the file after today's (UTC) date.
    ///
    /// # Errors
    ///
    /// See [`Exporter::export_on`].
    pub async fn export(&self) -> Result<PathBuf> {
        self.export_on(Utc::now().date_naive()).await
    }

    /// Export all entries into `fahrtenbuch_<date>.csv` and share the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExportUnavailable`] before anything is written if the
    /// share surface is unavailable, and a persistence error if the entries
    /// cannot be read or the file cannot be written.
    pub async fn export_on(&self, date: NaiveDate) -> Result<PathBuf> {
        if !self.fs.exists(&self.backup_directory).await {
            self.fs
                .create_dir_all(&self.backup_directory)
                .await
                .map_err(|source| Error::DirectoryCreate {
                    path: self.backup_directory.clone(),
                    source,
                })?;
        }

        if !self.share.is_available().await {
            return Err(Error::ExportUnavailable);
        }

        let entries = self.store.list().await?;
        let document = format::render(&entries, &Local);

        let path = self.backup_directory.join(export_file_name(date));
        debug!("Writing {} entries to {}", entries.len(), path.display());
        self.fs
            .write_string(&path, &document)
            .await
            .map_err(|source| Error::FileWrite {
                path: path.clone(),
                source,
            })?;

        self.share.share(&path, CSV_MIME_TYPE).await?;

        info!("Exported {} entries to {}", entries.len(), path.display());
        Ok(path)
    }
}

/// File name of an export made on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}_{}.csv", date.format("%Y-%m-%d"))
}
