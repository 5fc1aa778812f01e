//! Storage backends for the backup plan
//!
//! Every backend implements [`DataSource`], so the UI does not care whether
//! entries live in a CSV file, SQLite or MySQL.

mod csv_file;
mod dialect;
mod sql;

pub use csv_file::{CsvSource, CSV_HEADER};
pub use dialect::SqlDialect;
pub use sql::SqlSource;

use async_trait::async_trait;

use crate::entry::Entry;
use crate::Result;

/// CRUD contract shared by all storage backends
///
/// No backend locks across calls: two concurrent edits of the same entry can
/// interleave, the last write wins.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short backend name for logs and status output
    fn kind(&self) -> &'static str;

    /// All entries, in backend order
    async fn read_all(&self) -> Result<Vec<Entry>>;

    /// The entry with `id`, or [`crate::Error::NotFound`]
    async fn get_entry(&self, id: u16) -> Result<Entry>;

    /// Replace the stored entry whose ID equals `entry.id`
    async fn update_entry(&self, entry: &Entry) -> Result<()>;

    /// Remove the entry with `id` and return it
    async fn delete_entry(&self, id: u16) -> Result<Entry>;

    /// Store a new entry
    ///
    /// The backend picks the ID (first free one, see
    /// [`crate::entry::next_free_id`]) and writes it into `entry`.
    async fn add_entry(&self, entry: &mut Entry) -> Result<()>;
}
