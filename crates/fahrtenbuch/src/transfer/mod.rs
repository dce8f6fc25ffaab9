//! CSV export and import of the logbook.

pub mod export;
pub mod format;
pub mod import;

#[cfg(test)]
mod test_utils;

pub use export::{export_file_name, Exporter};
pub use import::{ImportReport, Importer};
