//! # Backup Plan UI Common Library
//!
//! Shared code for the backup plan web UI and the conversion tool:
//! - Entry data model and ID allocation
//! - Storage backends (CSV file, SQLite, MySQL) behind [`DataSource`]
//! - Backend configuration
//! - Common error type

pub mod config;
pub mod entry;
pub mod error;
pub mod sources;

pub use entry::{Entry, Instruction};
pub use error::{Error, Result};
pub use sources::{CsvSource, DataSource, SqlDialect, SqlSource};
