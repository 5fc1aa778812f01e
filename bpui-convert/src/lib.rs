//! Conversion of a CSV backup plan into a SQL database
//!
//! The CSV file is read and checked in full before the target database is
//! opened, so a bad row never leaves a half-written table behind.

use std::path::Path;

use bpui_common::config::MySqlConfig;
use bpui_common::{CsvSource, DataSource, Entry, Result, SqlSource};
use tracing::info;

/// Copy every entry of `csv` into the SQLite database at `sqlite`
///
/// The database file and table are created when missing. Returns the number
/// of entries written.
pub async fn convert_csv_to_sqlite(csv: &Path, sqlite: &Path) -> Result<usize> {
    let entries = read_normalized(csv).await?;

    let target = SqlSource::sqlite(sqlite).await?;
    info!("Writing {} entries to {}", entries.len(), sqlite.display());

    load_into(&target, entries).await
}

/// Copy every entry of `csv` into MySQL, replacing the configured table
pub async fn convert_csv_to_mysql(csv: &Path, config: &MySqlConfig) -> Result<usize> {
    let entries = read_normalized(csv).await?;

    let target = SqlSource::mysql(config).await?;
    if target.show_tables().await?.iter().any(|t| t == target.table()) {
        info!("Dropping existing table {}", target.table());
        target.drop_table().await?;
    }
    info!(
        "Writing {} entries to {}.{}",
        entries.len(),
        config.database,
        target.table()
    );

    load_into(&target, entries).await
}

async fn read_normalized(csv: &Path) -> Result<Vec<Entry>> {
    let source = CsvSource::new(csv);
    let entries = source.read_all().await?;
    info!("Read {} entries from {}", entries.len(), csv.display());

    Ok(entries.into_iter().map(normalize).collect())
}

/// Trim the free-text columns the UI does not trim on its own
fn normalize(mut entry: Entry) -> Entry {
    for value in [
        &mut entry.matches,
        &mut entry.ignore,
        &mut entry.requestor,
        &mut entry.faculty,
    ] {
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            *value = trimmed.to_string();
        }
    }
    entry
}

async fn load_into(target: &SqlSource, mut entries: Vec<Entry>) -> Result<usize> {
    let result = create_and_write(target, &mut entries).await;
    target.close().await;

    result.map(|()| entries.len())
}

async fn create_and_write(target: &SqlSource, entries: &mut [Entry]) -> Result<()> {
    target.create_table().await?;
    target.write_entries(entries).await
}
