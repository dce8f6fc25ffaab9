//! `fahrtenbuch` - CLI for the trip logbook
//!
//! This binary records, lists, deletes, exports and imports logbook entries.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::Parser;

use fahrtenbuch::cli::{Cli, Command, ConfigCommand, ListCommand, OutputFormat};
use fahrtenbuch::{init_logging, Config, Entry, Logbook};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let logbook = Logbook::open(&config).context("failed to open logbook")?;
            run(&config, &logbook, command).await
        }
    }
}

async fn run(config: &Config, logbook: &Logbook, command: Command) -> Result<()> {
    match command {
        Command::Add(cmd) => {
            let new_entry = cmd.to_new_entry(Utc::now()).map_err(|e| anyhow!(e))?;
            let entry = logbook
                .store()
                .save(new_entry)
                .await
                .context("failed to save entry")?;
            println!("Saved entry {}", entry.id);
        }
        Command::List(cmd) => handle_list(logbook, &cmd).await?,
        Command::Delete(cmd) => {
            let removed = logbook
                .store()
                .delete(cmd.id.as_str())
                .await
                .context("failed to delete entry")?;
            if removed {
                println!("Deleted entry {}", cmd.id);
            } else {
                println!("No entry with id {}", cmd.id);
            }
        }
        Command::Export => {
            let path = logbook.exporter().export().await.context("export failed")?;
            println!("{}", path.display());
        }
        Command::Import(cmd) => {
            let report = logbook
                .importer()
                .import(&cmd.file)
                .await
                .with_context(|| format!("failed to import {}", cmd.file.display()))?;
            println!("Imported {} entries", report.imported);
            if report.skipped > 0 {
                println!("Skipped {} malformed rows", report.skipped);
            }
        }
        Command::Status(cmd) => handle_status(logbook, cmd.json).await?,
        Command::Config(cmd) => handle_config(config, cmd)?,
    }

    Ok(())
}

async fn handle_list(logbook: &Logbook, cmd: &ListCommand) -> Result<()> {
    let entries = logbook
        .store()
        .list()
        .await
        .context("failed to read entries")?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => {
            for entry in &entries {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    entry.id,
                    display_date(entry),
                    entry.mileage,
                    entry.location.address,
                    entry.purpose
                );
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<36}  {:<10}  {:>10}  {:<30}  {}",
                "ID", "DATE", "MILEAGE", "LOCATION", "PURPOSE"
            );
            for entry in &entries {
                println!(
                    "{:<36}  {:<10}  {:>10}  {:<30}  {}{}",
                    entry.id,
                    display_date(entry),
                    entry.mileage,
                    truncate(&entry.location.address, 30),
                    entry.purpose,
                    if entry.has_photo() { "  [photo]" } else { "" }
                );
            }
            println!();
            println!("{} entries", entries.len());
        }
    }
    Ok(())
}

async fn handle_status(logbook: &Logbook, json: bool) -> Result<()> {
    let status = logbook.status().await.context("failed to read entries")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fahrtenbuch status");
        println!("------------------");
        println!("Entries:       {}", status.entries);
        println!("With photo:    {}", status.entries_with_photo);
        println!(
            "Database:      {} ({} bytes)",
            status.database_path.display(),
            status.database_size_bytes
        );
        println!("Photos:        {}", status.photos_directory.display());
        println!("Backups:       {}", status.backup_directory.display());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Collection key:     {}", config.storage.collection_key);
                println!();
                println!("[Photos]");
                println!("  Directory:          {}", config.photos_directory().display());
                println!();
                println!("[Export]");
                println!("  Backup directory:   {}", config.backup_directory().display());
                println!("  Sharing enabled:    {}", config.export.share_enabled);
                println!(
                    "  Share command:      {}",
                    config.export.share_command.as_deref().unwrap_or("(none)")
                );
                println!();
                println!("[Import]");
                println!("  Malformed rows:     {:?}", config.import.malformed_rows);
                println!();
                println!("[Store]");
                println!("  Queue capacity:     {}", config.store.queue_capacity);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn display_date(entry: &Entry) -> String {
    DateTime::parse_from_rfc3339(&entry.timestamp).map_or_else(
        |_| entry.timestamp.clone(),
        |dt| dt.with_timezone(&Local).format("%d.%m.%Y").to_string(),
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
