//! Shared fixtures for export/import tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::config::MalformedRowPolicy;
use crate::entry::{Location, NewEntry};
use crate::error::Result;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::photo::PhotoSidecar;
use crate::share::ShareSurface;
use crate::storage::SqliteStore;
use crate::store::{EntryStore, DEFAULT_COLLECTION_KEY};

use super::{Exporter, Importer};

/// Share surface that records what it was handed.
#[derive(Debug)]
pub struct RecordingShare {
    pub available: bool,
    pub shared: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingShare {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            shared: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(&self) -> Vec<(PathBuf, String)> {
        self.shared.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShareSurface for RecordingShare {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn share(&self, path: &Path, mime_type: &str) -> Result<()> {
        self.shared
            .lock()
            .unwrap()
            .push((path.to_path_buf(), mime_type.to_string()));
        Ok(())
    }
}

/// A store, exporter and importer over a temporary directory.
pub struct TransferFixture {
    pub dir: TempDir,
    pub store: EntryStore,
    pub share: Arc<RecordingShare>,
    pub exporter: Exporter,
}

impl TransferFixture {
    pub fn new() -> Self {
        Self::with_share(true)
    }

    pub fn with_share(available: bool) -> Self {
        crate::logging::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem);
        let kv = Arc::new(SqliteStore::open_in_memory().unwrap());
        let photos = PhotoSidecar::new(fs.clone(), dir.path().join("photos"));
        let store = EntryStore::spawn(kv, photos, DEFAULT_COLLECTION_KEY, 8);
        let share = Arc::new(RecordingShare::new(available));
        let exporter = Exporter::new(
            store.clone(),
            fs,
            share.clone(),
            dir.path().join("backups"),
        );
        Self {
            dir,
            store,
            share,
            exporter,
        }
    }

    pub fn importer(&self, policy: MalformedRowPolicy) -> Importer {
        Importer::new(self.store.clone(), Arc::new(LocalFileSystem), policy)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.dir.path().join("backups")
    }

    /// Write `contents` to a file in the fixture directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

/// A new entry without photo.
pub fn trip(timestamp: &str, mileage: &str, location: Location, purpose: &str) -> NewEntry {
    NewEntry {
        timestamp: timestamp.to_string(),
        mileage: mileage.to_string(),
        location,
        photo_uri: String::new(),
        purpose: purpose.to_string(),
    }
}
