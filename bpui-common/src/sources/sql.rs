//! SQL backend shared by SQLite and MySQL
//!
//! Both databases go through sqlx's `Any` driver; the differences live in
//! [`SqlDialect`]. Every mutation runs in its own transaction which commits on
//! success and rolls back on the first error.

use std::path::Path;

use async_trait::async_trait;
use sqlx::any::{AnyArguments, AnyPoolOptions, AnyRow};
use sqlx::AnyConnection;
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Row, Transaction};
use tracing::{debug, error, info};

use super::{DataSource, SqlDialect};
use crate::config::{MySqlConfig, DEFAULT_TABLE_NAME};
use crate::entry::{next_free_id, Entry};
use crate::{Error, Result};

/// Column list in [`Entry`] field order
///
/// `keep` holds the match patterns and `skip` the ignore patterns; `match` and
/// `ignore` are reserved words in MySQL.
const COLUMNS: &str =
    "id, reporting_name, reporting_root, directory, instruction, keep, skip, requestor, faculty";

/// Backup plan stored in an SQL table
#[derive(Debug, Clone)]
pub struct SqlSource {
    pool: AnyPool,
    table: String,
    dialect: SqlDialect,
}

impl SqlSource {
    /// Open (creating if needed) the SQLite database at `path`, using the default table
    pub async fn sqlite(path: &Path) -> Result<Self> {
        Self::sqlite_with_table(path, DEFAULT_TABLE_NAME).await
    }

    /// Open the SQLite database at `path` using `table`
    pub async fn sqlite_with_table(path: &Path, table: &str) -> Result<Self> {
        let url = format!("sqlite://{}?mode=rwc", path.display());
        Self::connect(&url, SqlDialect::Sqlite, table).await
    }

    /// Connect to the MySQL database described by `config`
    pub async fn mysql(config: &MySqlConfig) -> Result<Self> {
        Self::connect(&config.url(), SqlDialect::MySql, &config.table).await
    }

    async fn connect(url: &str, dialect: SqlDialect, table: &str) -> Result<Self> {
        if !is_valid_table_name(table) {
            return Err(Error::Config(format!("Invalid table name: {:?}", table)));
        }

        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        debug!("Connected to {:?} database, table {}", dialect, table);

        Ok(Self {
            pool,
            table: table.to_string(),
            dialect,
        })
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the entries table unless it already exists
    pub async fn create_table(&self) -> Result<()> {
        sqlx::query(&self.dialect.create_table_sql(&self.table))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn drop_table(&self) -> Result<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", self.table))
            .execute(&self.pool)
            .await?;

        info!("Dropped table {}", self.table);
        Ok(())
    }

    /// Names of the tables in the connected database
    pub async fn show_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(self.dialect.show_tables_sql())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(Error::from))
            .collect()
    }

    /// Bulk insert in a single transaction
    ///
    /// IDs come from the database's auto-increment and are written back
    /// into `entries`.
    pub async fn write_entries(&self, entries: &mut [Entry]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = self.insert_all(&mut tx, entries).await;
        finish(tx, result).await?;

        info!("Wrote {} entries to table {}", entries.len(), self.table);
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn insert_all(&self, conn: &mut AnyConnection, entries: &mut [Entry]) -> Result<()> {
        let mut sql = format!(
            "INSERT INTO {} (reporting_name, reporting_root, directory, instruction, keep, skip, requestor, faculty) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            self.table
        );
        let returning = self.dialect.supports_insert_returning();
        if returning {
            sql.push_str(" RETURNING id");
        }

        for entry in entries.iter_mut() {
            let query = bind_fields(sqlx::query(&sql), entry);

            // The Any driver only reports last_insert_id for MySQL
            let id = if returning {
                let row = query.fetch_one(&mut *conn).await?;
                row.try_get::<i64, _>("id")?
            } else {
                query
                    .execute(&mut *conn)
                    .await?
                    .last_insert_id()
                    .ok_or_else(|| {
                        Error::Storage("database did not report the inserted ID".to_string())
                    })?
            };

            entry.id = id_from_db(id)?;
        }

        Ok(())
    }

    async fn insert_with_free_id(&self, conn: &mut AnyConnection, entry: &Entry) -> Result<u16> {
        let used: Vec<i64> = sqlx::query_scalar(&format!("SELECT id FROM {}", self.table))
            .fetch_all(&mut *conn)
            .await?;

        let used = used.into_iter().map(id_from_db).collect::<Result<Vec<u16>>>()?;
        let id = next_free_id(used)?;

        if let Some(preamble) = self.dialect.explicit_id_preamble() {
            sqlx::query(preamble).execute(&mut *conn).await?;
        }

        let sql = format!(
            "INSERT INTO {} ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.table
        );
        bind_fields(sqlx::query(&sql).bind(i64::from(id)), entry)
            .execute(&mut *conn)
            .await?;

        Ok(id)
    }

    async fn update_in(&self, conn: &mut AnyConnection, entry: &Entry) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET reporting_name = ?, reporting_root = ?, directory = ?, instruction = ?, \
             keep = ?, skip = ?, requestor = ?, faculty = ? WHERE id = ?",
            self.table
        );
        let result = bind_fields(sqlx::query(&sql), entry)
            .bind(i64::from(entry.id))
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // MySQL reports zero affected rows when nothing changed
        let exists = sqlx::query(&format!("SELECT id FROM {} WHERE id = ?", self.table))
            .bind(i64::from(entry.id))
            .fetch_optional(&mut *conn)
            .await?
            .is_some();

        if exists {
            Ok(())
        } else {
            Err(Error::NotFound(entry.id))
        }
    }

    async fn delete_in(&self, conn: &mut AnyConnection, id: u16) -> Result<Entry> {
        if self.dialect.supports_delete_returning() {
            let row = sqlx::query(&format!(
                "DELETE FROM {} WHERE id = ? RETURNING {COLUMNS}",
                self.table
            ))
            .bind(i64::from(id))
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(Error::NotFound(id))?;

            return entry_from_row(&row);
        }

        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {} WHERE id = ?", self.table))
            .bind(i64::from(id))
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(Error::NotFound(id))?;
        let entry = entry_from_row(&row)?;

        sqlx::query(&format!("DELETE FROM {} WHERE id = ?", self.table))
            .bind(i64::from(id))
            .execute(&mut *conn)
            .await?;

        Ok(entry)
    }
}

#[async_trait]
impl DataSource for SqlSource {
    fn kind(&self) -> &'static str {
        self.dialect.name()
    }

    async fn read_all(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM {} ORDER BY id", self.table))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn get_entry(&self, id: u16) -> Result<Entry> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {} WHERE id = ?", self.table))
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound(id))?;

        entry_from_row(&row)
    }

    async fn update_entry(&self, entry: &Entry) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = self.update_in(&mut tx, entry).await;
        finish(tx, result).await
    }

    async fn delete_entry(&self, id: u16) -> Result<Entry> {
        let mut tx = self.pool.begin().await?;
        let result = self.delete_in(&mut tx, id).await;
        finish(tx, result).await
    }

    async fn add_entry(&self, entry: &mut Entry) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = self.insert_with_free_id(&mut tx, entry).await;
        entry.id = finish(tx, result).await?;

        Ok(())
    }
}

/// Commit on success, roll back on failure
async fn finish<T>(tx: Transaction<'static, Any>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// Bind every column except `id`, in [`COLUMNS`] order
fn bind_fields<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    entry: &'q Entry,
) -> Query<'q, Any, AnyArguments<'q>> {
    query
        .bind(entry.reporting_name.as_str())
        .bind(entry.reporting_root.as_str())
        .bind(entry.directory.as_str())
        .bind(entry.instruction.as_str())
        .bind(entry.matches.as_str())
        .bind(entry.ignore.as_str())
        .bind(entry.requestor.as_str())
        .bind(entry.faculty.as_str())
}

/// Read a text column, NULL as empty
///
/// MySQL `TEXT` columns arrive as blobs through the `Any` driver, so those
/// are decoded as UTF-8 bytes instead.
fn text_column(row: &AnyRow, column: &str) -> Result<String> {
    match row.try_get::<Option<String>, _>(column) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let bytes = row.try_get::<Option<Vec<u8>>, _>(column)?;
            text_from_bytes(column, bytes.unwrap_or_default())
        }
        Err(e) => Err(e.into()),
    }
}

fn text_from_bytes(column: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidEntry(format!("column {} is not valid UTF-8: {}", column, e)))
}

fn entry_from_row(row: &AnyRow) -> Result<Entry> {
    let text = |column: &str| text_column(row, column);

    Ok(Entry {
        id: id_from_db(row.try_get::<i64, _>("id")?)?,
        reporting_name: text("reporting_name")?,
        reporting_root: text("reporting_root")?,
        directory: text("directory")?,
        instruction: text("instruction")?.parse()?,
        matches: text("keep")?,
        ignore: text("skip")?,
        requestor: text("requestor")?,
        faculty: text("faculty")?,
    })
}

fn id_from_db(id: i64) -> Result<u16> {
    u16::try_from(id)
        .map_err(|_| Error::InvalidEntry(format!("ID {} does not fit in 16 bits", id)))
}

/// Table names are interpolated into SQL, so only identifiers are allowed
fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
