//! Command-line interface for fahrtenbuch.
//!
//! This module provides the CLI structure for the `fahrtenbuch` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, ImportCommand, ListCommand, OutputFormat,
    StatusCommand,
};

/// fahrtenbuch - Keep a logbook of your trips
///
/// Records odometer readings with location, purpose and an optional photo,
/// and moves the logbook in and out of CSV files.
#[derive(Debug, Parser)]
#[command(name = "fahrtenbuch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a trip
    Add(AddCommand),

    /// List recorded trips
    List(ListCommand),

    /// Delete a trip and its photo
    Delete(DeleteCommand),

    /// Export all trips to a CSV file
    Export,

    /// Replace all trips with the contents of a CSV file
    Import(ImportCommand),

    /// Show logbook status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "fahrtenbuch");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["fahrtenbuch", "-q", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["fahrtenbuch", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);

        let cli = Cli::try_parse_from(["fahrtenbuch", "status"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "fahrtenbuch",
            "add",
            "12345.6",
            "Client visit",
            "--address",
            "Main St, Köln",
            "--lat",
            "50.9",
            "--lon",
            "-6.9",
            "--photo",
            "/tmp/shot.jpg",
        ])
        .unwrap();

        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.mileage, "12345.6");
        assert_eq!(add.purpose, "Client visit");
        assert_eq!(add.address, "Main St, Köln");
        assert_eq!(add.lat, Some(50.9));
        assert_eq!(add.lon, Some(-6.9));
        assert_eq!(add.photo, Some(PathBuf::from("/tmp/shot.jpg")));
    }

    #[test]
    fn test_parse_add_requires_both_coordinates() {
        let result = Cli::try_parse_from(["fahrtenbuch", "add", "1", "x", "--lat", "50.9"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_format() {
        let cli = Cli::try_parse_from(["fahrtenbuch", "list", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List(ListCommand {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_parse_delete_import_export() {
        let cli = Cli::try_parse_from(["fahrtenbuch", "delete", "abc"]).unwrap();
        assert!(matches!(cli.command, Command::Delete(DeleteCommand { ref id }) if id == "abc"));

        let cli = Cli::try_parse_from(["fahrtenbuch", "import", "backup.csv"]).unwrap();
        let Command::Import(import) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(import.file, PathBuf::from("backup.csv"));

        let cli = Cli::try_parse_from(["fahrtenbuch", "export"]).unwrap();
        assert!(matches!(cli.command, Command::Export));
    }

    #[test]
    fn test_parse_config_validate() {
        let args = ["fahrtenbuch", "config", "validate", "-f", "/tmp/c.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["fahrtenbuch", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
