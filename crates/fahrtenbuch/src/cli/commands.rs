//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Args, Subcommand, ValueEnum};

use crate::entry::{Location, NewEntry};
use crate::transfer::format::import_timestamp;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Odometer reading, e.g. "12345.6"
    pub mileage: String,

    /// Purpose of the trip
    pub purpose: String,

    /// Address of the location
    #[arg(short, long, default_value = "")]
    pub address: String,

    /// Latitude of the location
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the location
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Photo to attach (copied into the logbook)
    #[arg(short, long, value_name = "FILE")]
    pub photo: Option<PathBuf>,

    /// When the trip happened (RFC 3339, "dd.mm.yyyy" or "yyyy-mm-dd"); defaults to now
    #[arg(short, long)]
    pub timestamp: Option<String>,
}

impl AddCommand {
    /// Build the entry to save.
    ///
    /// # Errors
    ///
    /// Returns a message if the timestamp cannot be understood.
    pub fn to_new_entry(&self, now: DateTime<Utc>) -> Result<NewEntry, String> {
        let timestamp = match &self.timestamp {
            Some(raw) => {
                import_timestamp(raw).ok_or_else(|| format!("invalid timestamp '{raw}'"))?
            }
            None => now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let location = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Location::new(lat, lon, self.address.clone()),
            _ => Location::from_address(self.address.clone()),
        };
        let photo_uri = self
            .photo
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(NewEntry {
            timestamp,
            mileage: self.mileage.clone(),
            location,
            photo_uri,
            purpose: self.purpose.clone(),
        })
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the entry to delete
    pub id: String,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// CSV file to import; replaces all stored entries
    pub file: PathBuf,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
