//! Filesystem boundary.
//!
//! Photo relocation, export and import only touch files through
//! [`FileSystem`], so the rest of the crate never calls `tokio::fs` directly.

use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Async file operations used by the logbook.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Whether something exists at `path`.
    async fn exists(&self, path: &Path) -> bool;

    /// Create `path` and all missing parents.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy the file at `from` to `to`, overwriting `to`.
    async fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Delete the file at `path`. A missing file is not an error.
    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Read a UTF-8 text file.
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write `contents` to `path`, replacing the file.
    async fn write_string(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The local disk, via `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        tokio::fs::copy(from, to).await.map(|_| ())
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        match tokio::fs::remove_file(path).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write_string(&self, path: &Path, contents: &str) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }
}
