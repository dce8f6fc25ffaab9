//! Share surface for exported files.
//!
//! On a phone this is the system share sheet. On the desktop, [`SystemShare`]
//! either runs a configured opener command with the file path or just logs
//! where the file was written.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::error::{Error, Result};

/// MIME type of exported logbooks.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Environment variable carrying the MIME type to the share command.
const MIME_ENV_VAR: &str = "FAHRTENBUCH_SHARE_MIME_TYPE";

/// Something that can hand an exported file to the user.
#[async_trait]
pub trait ShareSurface: Send + Sync + std::fmt::Debug {
    /// Whether sharing can be attempted at all.
    async fn is_available(&self) -> bool;

    /// Hand `path` to the user.
    async fn share(&self, path: &Path, mime_type: &str) -> Result<()>;
}

/// Desktop share surface driven by configuration.
#[derive(Debug, Clone, Default)]
pub struct SystemShare {
    enabled: bool,
    command: Option<Vec<String>>,
}

impl SystemShare {
    /// Create a share surface.
    ///
    /// `command` is split on whitespace; the file path is appended as the
    /// last argument.
    #[must_use]
    pub fn new(enabled: bool, command: Option<&str>) -> Self {
        let command = command
            .map(|c| c.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        Self { enabled, command }
    }

    /// Build from the export section of the configuration.
    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.share_enabled, config.share_command.as_deref())
    }
}

#[async_trait]
impl ShareSurface for SystemShare {
    async fn is_available(&self) -> bool {
        self.enabled
    }

    async fn share(&self, path: &Path, mime_type: &str) -> Result<()> {
        let Some((program, args)) = self.command.as_ref().and_then(|c| c.split_first()) else {
            info!("Export written to {} ({})", path.display(), mime_type);
            return Ok(());
        };

        debug!("Sharing {} via {}", path.display(), program);
        let status = Command::new(program)
            .args(args)
            .arg(path)
            .env(MIME_ENV_VAR, mime_type)
            .status()
            .await
            .map_err(|e| Error::Share {
                path: path.to_path_buf(),
                message: format!("failed to run {program}: {e}"),
            })?;

        if !status.success() {
            return Err(Error::Share {
                path: path.to_path_buf(),
                message: format!("{program} exited with {status}"),
            });
        }

        info!("Shared {} via {}", path.display(), program);
        Ok(())
    }
}
