//! `fahrtenbuch` - a vehicle trip logbook
//!
//! Each trip records a timestamp, odometer reading, location, purpose and an
//! optional photo. Entries persist as a single JSON collection in a key-value
//! store and can be exported to and imported from CSV.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod fs;
pub mod logbook;
pub mod logging;
pub mod photo;
pub mod share;
pub mod storage;
pub mod store;
pub mod transfer;

pub use config::Config;
pub use entry::{Entry, Location, NewEntry};
pub use error::{Error, ErrorKind, Result};
pub use logbook::{Logbook, LogbookStatus};
pub use logging::init_logging;
pub use store::EntryStore;
pub use transfer::{Exporter, ImportReport, Importer};
