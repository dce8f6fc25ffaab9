//! Error types for fahrtenbuch.
//!
//! Every failure surfaced by the logbook falls into one of the categories in
//! [`ErrorKind`]; callers that only care about the category (the CLI, tests)
//! can match on [`Error::kind`] instead of individual variants.

use std::path::PathBuf;
use thiserror::Error;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Storage read/write failure or an unparseable stored payload.
    Persistence,
    /// Copying a photo into durable storage failed.
    PhotoRelocation,
    /// No share surface is available for an export.
    ExportUnavailable,
    /// An import file could not be read or was rejected.
    ImportParse,
    /// Configuration could not be loaded or is invalid.
    Config,
    /// Anything else (bugs, a stopped writer task).
    Internal,
}

/// The main error type for fahrtenbuch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Persistence Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The stored entry collection is not valid JSON.
    #[error("stored collection under '{key}' is corrupt: {source}")]
    CorruptCollection {
        /// Storage key that held the payload.
        key: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a file failed.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Deleting a photo sidecar failed for a reason other than absence.
    #[error("failed to remove photo {path}: {source}")]
    PhotoRemove {
        /// Path of the photo.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Photo Errors ===
    /// Copying a captured photo into the photo directory failed.
    #[error("failed to relocate photo {from} to {to}: {source}")]
    PhotoRelocation {
        /// The transient source uri.
        from: String,
        /// The durable destination.
        to: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Export Errors ===
    /// The share surface reported itself unavailable.
    #[error("sharing is not available on this platform")]
    ExportUnavailable,

    /// The share surface failed while handing off the file.
    #[error("failed to share {path}: {message}")]
    Share {
        /// The exported file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === Import Errors ===
    /// The import file could not be read.
    #[error("failed to read import file {path}: {source}")]
    ImportRead {
        /// Path of the import file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The import file was rejected.
    #[error("cannot import {path}, line {line}: {message}")]
    ImportParse {
        /// Path of the import file.
        path: PathBuf,
        /// 1-based line number of the offending record.
        line: u64,
        /// Description of the problem.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Generic Errors ===
    /// The entry store's writer task is gone.
    #[error("entry store is closed")]
    StoreClosed,

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for fahrtenbuch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an import rejection for the given file and line.
    #[must_use]
    pub fn import_parse(path: impl Into<PathBuf>, line: u64, message: impl Into<String>) -> Self {
        Self::ImportParse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// The category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DatabaseOpen { .. }
            | Self::DatabaseQuery(_)
            | Self::CorruptCollection { .. }
            | Self::Json(_)
            | Self::FileWrite { .. }
            | Self::DirectoryCreate { .. }
            | Self::PhotoRemove { .. }
            | Self::Io(_) => ErrorKind::Persistence,
            Self::PhotoRelocation { .. } => ErrorKind::PhotoRelocation,
            Self::ExportUnavailable | Self::Share { .. } => ErrorKind::ExportUnavailable,
            Self::ImportRead { .. } | Self::ImportParse { .. } => ErrorKind::ImportParse,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::StoreClosed | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if this error is a storage failure.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        self.kind() == ErrorKind::Persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::ExportUnavailable.to_string(),
            "sharing is not available on this platform"
        );
        assert_eq!(Error::StoreClosed.to_string(), "entry store is closed");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_import_parse_display() {
        let err = Error::import_parse("/tmp/in.csv", 3, "expected 4 fields, found 2");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/in.csv"));
        assert!(msg.contains("line 3"));
        assert!(msg.contains("expected 4 fields"));
        assert_eq!(err.kind(), ErrorKind::ImportParse);
    }

    #[test]
    fn test_photo_relocation_display() {
        let err = Error::PhotoRelocation {
            from: "file:///cache/shot.jpg".to_string(),
            to: PathBuf::from("/data/photos/abc.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/cache/shot.jpg"));
        assert!(msg.contains("/data/photos/abc.jpg"));
        assert_eq!(err.kind(), ErrorKind::PhotoRelocation);
    }

    #[test]
    fn test_kind_mapping() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(Error::from(io_err).is_persistence());
        assert_eq!(Error::ExportUnavailable.kind(), ErrorKind::ExportUnavailable);
        assert_eq!(
            Error::Share {
                path: PathBuf::from("x.csv"),
                message: "exit status 1".to_string(),
            }
            .kind(),
            ErrorKind::ExportUnavailable
        );
        assert_eq!(
            Error::ConfigValidation {
                message: "bad".to_string()
            }
            .kind(),
            ErrorKind::Config
        );
        assert_eq!(Error::StoreClosed.kind(), ErrorKind::Internal);
        assert!(!Error::StoreClosed.is_persistence());
    }

    #[test]
    fn test_corrupt_collection_is_persistence() {
        let json_err = serde_json::from_str::<Vec<i32>>("not json").unwrap_err();
        let err = Error::CorruptCollection {
            key: "@fahrtenbuch_entries".to_string(),
            source: json_err,
        };
        assert!(err.to_string().contains("@fahrtenbuch_entries"));
        assert!(err.is_persistence());
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
            assert!(err.is_persistence());
        }
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
