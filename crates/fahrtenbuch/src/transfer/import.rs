//! CSV import.
//!
//! An import replaces the whole logbook. The CSV carries no ids, coordinates
//! or photos, so imported entries get fresh ids, the `(0, 0)` location
//! sentinel and no photo. Photo files of the replaced entries stay on disk.

use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::config::MalformedRowPolicy;
use crate::entry::{Entry, Location};
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::store::EntryStore;

use super::format::{import_timestamp, FIELD_COUNT};

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Entries now stored.
    pub imported: usize,
    /// Malformed rows that were skipped.
    pub skipped: usize,
}

/// Reads CSV files back into the logbook.
#[derive(Debug, Clone)]
pub struct Importer {
    store: EntryStore,
    fs: Arc<dyn FileSystem>,
    policy: MalformedRowPolicy,
}

impl Importer {
    /// Create an importer.
    #[must_use]
    pub fn new(store: EntryStore, fs: Arc<dyn FileSystem>, policy: MalformedRowPolicy) -> Self {
        Self { store, fs, policy }
    }

    /// Replace the stored entries with the rows of the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an import error if the file cannot be read or, under
    /// [`MalformedRowPolicy::Reject`], contains a malformed row. The stored
    /// collection is untouched in both cases. A persistence error is
    /// returned if the new collection cannot be written.
    pub async fn import(&self, path: impl AsRef<Path>) -> Result<ImportReport> {
        let path = path.as_ref();
        let content = self
            .fs
            .read_to_string(path)
            .await
            .map_err(|source| Error::ImportRead {
                path: path.to_path_buf(),
                source,
            })?;

        let (entries, skipped) = parse_document(&content, path, self.policy)?;
        let report = ImportReport {
            imported: entries.len(),
            skipped,
        };

        self.store.replace_all(entries).await?;

        info!(
            "Imported {} entries from {} ({} skipped)",
            report.imported,
            path.display(),
            report.skipped
        );
        Ok(report)
    }
}

/// Parse a CSV document into new entries.
///
/// The first record is the header and is ignored. Returns the entries and
/// the number of skipped rows.
///
/// # Errors
///
/// Returns [`Error::ImportParse`] if the CSV itself is unreadable, or if a
/// row is malformed and `policy` is [`MalformedRowPolicy::Reject`].
pub fn parse_document(
    content: &str,
    path: &Path,
    policy: MalformedRowPolicy,
) -> Result<(Vec<Entry>, usize)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    let mut skipped = 0;

    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map_or(0, csv::Position::line);
            Error::import_parse(path, line, e.to_string())
        })?;
        let line = record.position().map_or(0, csv::Position::line);

        match entry_from_record(&record) {
            Ok(entry) => entries.push(entry),
            Err(message) => match policy {
                MalformedRowPolicy::Reject => {
                    return Err(Error::import_parse(path, line, message));
                }
                MalformedRowPolicy::Skip => {
                    warn!("Skipping line {} of {}: {}", line, path.display(), message);
                    skipped += 1;
                }
            },
        }
    }

    Ok((entries, skipped))
}

fn entry_from_record(record: &StringRecord) -> std::result::Result<Entry, String> {
    if record.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} fields, found {}",
            record.len()
        ));
    }

    let date = &record[0];
    let timestamp = import_timestamp(date).ok_or_else(|| format!("unrecognised date '{date}'"))?;

    Ok(Entry {
        id: Entry::generate_id(),
        timestamp,
        mileage: record[1].to_string(),
        location: Location::from_address(&record[2]),
        photo_uri: String::new(),
        purpose: record[3].to_string(),
    })
}
