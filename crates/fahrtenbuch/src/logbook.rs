//! The assembled logbook.
//!
//! [`Logbook::open`] builds the storage backend, photo sidecar, entry store,
//! exporter and importer from a [`Config`].

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::photo::PhotoSidecar;
use crate::share::{ShareSurface, SystemShare};
use crate::storage::SqliteStore;
use crate::store::EntryStore;
use crate::transfer::{Exporter, Importer};

/// Everything the CLI needs, wired together.
#[derive(Debug)]
pub struct Logbook {
    database: Arc<SqliteStore>,
    photos_directory: PathBuf,
    store: EntryStore,
    exporter: Exporter,
    importer: Importer,
}

/// Summary shown by `fahrtenbuch status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogbookStatus {
    /// Number of stored entries.
    pub entries: usize,
    /// Entries with a sidecar photo.
    pub entries_with_photo: usize,
    /// Database file.
    pub database_path: PathBuf,
    /// Database size in bytes.
    pub database_size_bytes: u64,
    /// Photo directory.
    pub photos_directory: PathBuf,
    /// Export directory.
    pub backup_directory: PathBuf,
}

impl Logbook {
    /// Open the logbook described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: &Config) -> Result<Self> {
        let database = Arc::new(SqliteStore::open(config.database_path())?);
        let share: Arc<dyn ShareSurface> = Arc::new(SystemShare::from_config(&config.export));
        Ok(Self::assemble(config, database, share))
    }

    fn assemble(
        config: &Config,
        database: Arc<SqliteStore>,
        share: Arc<dyn ShareSurface>,
    ) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem);
        let photos_directory = config.photos_directory();
        debug!("Photos in {}", photos_directory.display());

        let photos = PhotoSidecar::new(fs.clone(), photos_directory.clone());
        let store = EntryStore::spawn(
            database.clone(),
            photos,
            config.storage.collection_key.clone(),
            config.store.queue_capacity,
        );
        let exporter = Exporter::new(
            store.clone(),
            fs.clone(),
            share,
            config.backup_directory(),
        );
        let importer = Importer::new(store.clone(), fs, config.import.malformed_rows);

        Self {
            database,
            photos_directory,
            store,
            exporter,
            importer,
        }
    }

    /// The entry store.
    #[must_use]
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// The CSV exporter.
    #[must_use]
    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// The CSV importer.
    #[must_use]
    pub fn importer(&self) -> &Importer {
        &self.importer
    }

    /// Collect a status summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be read.
    pub async fn status(&self) -> Result<LogbookStatus> {
        let entries = self.store.list().await?;
        Ok(LogbookStatus {
            entries: entries.len(),
            entries_with_photo: entries.iter().filter(|e| e.has_photo()).count(),
            database_path: self.database.path().to_path_buf(),
            database_size_bytes: self.database.size_bytes(),
            photos_directory: self.photos_directory.clone(),
            backup_directory: self.exporter.backup_directory().to_path_buf(),
        })
    }
}
