//! The entry store.
//!
//! All entries live as one JSON array under a single key. Every operation
//! reads the whole collection, modifies it and writes it back. To keep
//! overlapping calls from losing each other's writes, the collection is owned
//! by a single writer task; [`EntryStore`] is a cheap, cloneable handle that
//! queues requests to it.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::entry::{Entry, NewEntry};
use crate::error::{Error, Result};
use crate::photo::PhotoSidecar;
use crate::storage::KeyValueStore;

/// Default storage key of the entry collection.
pub const DEFAULT_COLLECTION_KEY: &str = "@fahrtenbuch_entries";

#[derive(Debug)]
enum Request {
    Save {
        entry: NewEntry,
        reply: oneshot::Sender<Result<Entry>>,
    },
    List {
        reply: oneshot::Sender<Result<Vec<Entry>>>,
    },
    Delete {
        id: String,
        reply: oneshot::Sender<Result<bool>>,
    },
    Replace {
        entries: Vec<Entry>,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Handle to the entry collection.
///
/// Requests are processed strictly one at a time in arrival order.
#[derive(Debug, Clone)]
pub struct EntryStore {
    tx: mpsc::Sender<Request>,
}

impl EntryStore {
    /// Spawn the writer task and return a handle to it.
    ///
    /// Must be called from within a Tokio runtime. The task stops once every
    /// handle has been dropped.
    #[must_use]
    pub fn spawn(
        kv: Arc<dyn KeyValueStore>,
        photos: PhotoSidecar,
        collection_key: impl Into<String>,
        queue_capacity: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let writer = Writer {
            kv,
            photos,
            key: collection_key.into(),
        };
        tokio::spawn(writer.run(rx));
        Self { tx }
    }

    /// Persist a new entry, assigning its id and moving its photo.
    ///
    /// # Errors
    ///
    /// Fails with a persistence error if storage cannot be read or written,
    /// or [`Error::PhotoRelocation`] if the photo cannot be copied. Nothing
    /// is stored in either case.
    pub async fn save(&self, entry: NewEntry) -> Result<Entry> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::Save { entry, reply }, rx).await
    }

    /// All entries in insertion order.
    ///
    /// # Errors
    ///
    /// Fails with a persistence error on a read failure or corrupt payload.
    pub async fn list(&self) -> Result<Vec<Entry>> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::List { reply }, rx).await
    }

    /// Delete the entry with `id` together with its photo.
    ///
    /// Returns `false` if no such entry exists.
    ///
    /// # Errors
    ///
    /// Fails with a persistence error if storage cannot be read or written,
    /// in which case the entry and its photo are kept. The photo is removed
    /// after the collection is written; failing that is only logged.
    pub async fn delete(&self, id: impl Into<String>) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.request(
            Request::Delete {
                id: id.into(),
                reply,
            },
            rx,
        )
        .await
    }

    /// Replace the whole collection.
    ///
    /// Photo files of previous entries are left on disk.
    ///
    /// # Errors
    ///
    /// Fails with a persistence error if the collection cannot be written or
    /// the previous one cannot be read. A corrupt previous collection is
    /// replaced without error.
    pub async fn replace_all(&self, entries: Vec<Entry>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::Replace { entries, reply }, rx).await
    }

    async fn request<T>(&self, request: Request, rx: oneshot::Receiver<Result<T>>) -> Result<T> {
        self.tx.send(request).await.map_err(|_| Error::StoreClosed)?;
        rx.await.map_err(|_| Error::StoreClosed)?
    }
}

/// Owner of the collection; lives inside the spawned task.
#[derive(Debug)]
struct Writer {
    kv: Arc<dyn KeyValueStore>,
    photos: PhotoSidecar,
    key: String,
}

impl Writer {
    async fn run(self, mut rx: mpsc::Receiver<Request>) {
        debug!("Entry store writer started for key {}", self.key);
        while let Some(request) = rx.recv().await {
            // A dropped receiver means the caller went away; nothing to report.
            match request {
                Request::Save { entry, reply } => {
                    let _ = reply.send(self.save(entry).await);
                }
                Request::List { reply } => {
                    let _ = reply.send(self.load().await);
                }
                Request::Delete { id, reply } => {
                    let _ = reply.send(self.delete(&id).await);
                }
                Request::Replace { entries, reply } => {
                    let _ = reply.send(self.replace(entries).await);
                }
            }
        }
        debug!("Entry store writer stopped");
    }

    async fn load(&self) -> Result<Vec<Entry>> {
        match self.kv.get(&self.key).await? {
            Some(json) => serde_json::from_str(&json).map_err(|source| Error::CorruptCollection {
                key: self.key.clone(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.kv.set(&self.key, &json).await
    }

    async fn save(&self, new_entry: NewEntry) -> Result<Entry> {
        let mut entries = self.load().await?;

        let mut id = Entry::generate_id();
        while entries.iter().any(|e| e.id == id) {
            id = Entry::generate_id();
        }
        let mut entry = new_entry.with_id(id);

        if entry.has_photo() {
            entry.photo_uri = self.photos.relocate(&entry.photo_uri, &entry.id).await?;
        }

        entries.push(entry.clone());
        if let Err(e) = self.persist(&entries).await {
            if entry.has_photo() {
                if let Err(cleanup) = self.photos.remove(&entry.photo_uri).await {
                    warn!("Failed to clean up photo of unsaved entry {}: {}", entry.id, cleanup);
                }
            }
            return Err(e);
        }

        info!("Saved entry {} ({} total)", entry.id, entries.len());
        Ok(entry)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.load().await?;
        let Some(index) = entries.iter().position(|e| e.id == id) else {
            debug!("No entry with id {}, nothing to delete", id);
            return Ok(false);
        };

        let removed = entries.remove(index);
        self.persist(&entries).await?;

        if let Err(e) = self.photos.remove(&removed.photo_uri).await {
            warn!("Failed to remove photo of deleted entry {}: {}", id, e);
        }

        info!("Deleted entry {} ({} remaining)", id, entries.len());
        Ok(true)
    }

    async fn replace(&self, entries: Vec<Entry>) -> Result<()> {
        let previous = match self.load().await {
            Ok(previous) => previous,
            Err(e @ Error::CorruptCollection { .. }) => {
                warn!("Replacing unreadable collection: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        self.persist(&entries).await?;

        // Photo files are left in place; only `delete` removes them.
        let kept: HashSet<&str> = entries
            .iter()
            .filter(|e| e.has_photo())
            .map(|e| e.photo_uri.as_str())
            .collect();
        for old in previous
            .iter()
            .filter(|e| e.has_photo() && !kept.contains(e.photo_uri.as_str()))
        {
            info!(
                "Photo {} of replaced entry {} is no longer referenced",
                old.photo_uri, old.id
            );
        }

        info!(
            "Replaced {} entries with {} entries",
            previous.len(),
            entries.len()
        );
        Ok(())
    }
}
