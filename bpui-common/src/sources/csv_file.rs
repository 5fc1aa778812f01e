//! Flat CSV file backend
//!
//! The whole file is loaded for every call and rewritten for every mutation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::DataSource;
use crate::entry::{next_free_id, Entry};
use crate::{Error, Result};

/// Column names, in file order
pub const CSV_HEADER: [&str; 9] = [
    "id",
    "reporting_name",
    "reporting_root",
    "directory",
    "instruction",
    "match",
    "ignore",
    "requestor",
    "faculty",
];

/// Backup plan stored as a CSV file
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with `entries`
    ///
    /// The header row is always written, even when `entries` is empty.
    pub async fn write_entries(&self, entries: &[Entry]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER)?;
        for entry in entries {
            writer.serialize(entry)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;

        tokio::fs::write(&self.path, bytes).await?;
        debug!("Wrote {} entries to {}", entries.len(), self.path.display());

        Ok(())
    }
}

/// Parse CSV text into entries
///
/// Rows with an unknown instruction are reported as [`Error::InvalidEntry`]
/// so callers can tell bad data from a broken file.
fn parse_entries(bytes: &[u8]) -> Result<Vec<Entry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    reader
        .deserialize::<Entry>()
        .map(|row| {
            row.map_err(|e| match e.kind() {
                csv::ErrorKind::Deserialize { .. } => Error::InvalidEntry(e.to_string()),
                _ => Error::Csv(e),
            })
        })
        .collect()
}

fn position_of(entries: &[Entry], id: u16) -> Result<usize> {
    entries
        .iter()
        .position(|entry| entry.id == id)
        .ok_or(Error::NotFound(id))
}

#[async_trait]
impl DataSource for CsvSource {
    fn kind(&self) -> &'static str {
        "csv"
    }

    async fn read_all(&self) -> Result<Vec<Entry>> {
        let bytes = tokio::fs::read(&self.path).await?;
        parse_entries(&bytes)
    }

    async fn get_entry(&self, id: u16) -> Result<Entry> {
        let mut entries = self.read_all().await?;
        let index = position_of(&entries, id)?;
        Ok(entries.swap_remove(index))
    }

    async fn update_entry(&self, entry: &Entry) -> Result<()> {
        let mut entries = self.read_all().await?;
        let index = position_of(&entries, entry.id)?;

        entries[index] = entry.clone();

        self.write_entries(&entries).await
    }

    async fn delete_entry(&self, id: u16) -> Result<Entry> {
        let mut entries = self.read_all().await?;
        let index = position_of(&entries, id)?;

        let removed = entries.remove(index);
        self.write_entries(&entries).await?;

        Ok(removed)
    }

    async fn add_entry(&self, entry: &mut Entry) -> Result<()> {
        let mut entries = self.read_all().await?;

        entry.id = next_free_id(entries.iter().map(|e| e.id))?;
        entries.push(entry.clone());

        self.write_entries(&entries).await
    }
}
