//! SQL dialect differences between SQLite and MySQL

use crate::entry::Instruction;

/// Which database a [`super::SqlSource`] talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Sqlite,
    MySql,
}

impl SqlDialect {
    pub fn name(&self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::MySql => "mysql",
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for `table`
    ///
    /// MySQL text columns are VARCHAR so they decode as text through the
    /// `Any` driver (TEXT comes back as a blob).
    pub fn create_table_sql(&self, table: &str) -> String {
        let (id_column, text) = match self {
            SqlDialect::Sqlite => ("id INTEGER PRIMARY KEY AUTOINCREMENT", "TEXT"),
            SqlDialect::MySql => ("id BIGINT PRIMARY KEY AUTO_INCREMENT", "VARCHAR(1024)"),
        };

        let [backup, nobackup, tempbackup] = Instruction::ALL.map(|i| i.as_str());

        format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                {id_column},
                reporting_name {text},
                reporting_root {text},
                directory {text},
                instruction VARCHAR(16) CHECK ( instruction IN ('{backup}', '{nobackup}', '{tempbackup}') ),
                keep {text},
                skip {text},
                requestor {text},
                faculty {text}
            )"
        )
    }

    /// Query listing the tables of the current database; first column is the name
    pub fn show_tables_sql(&self) -> &'static str {
        match self {
            SqlDialect::Sqlite => {
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
            }
            SqlDialect::MySql => "SHOW TABLES",
        }
    }

    /// Whether `DELETE ... RETURNING` can hand back the removed row
    pub fn supports_delete_returning(&self) -> bool {
        matches!(self, SqlDialect::Sqlite)
    }

    /// Whether `INSERT ... RETURNING id` reports generated IDs
    ///
    /// Through the `Any` driver SQLite never fills in `last_insert_id`.
    pub fn supports_insert_returning(&self) -> bool {
        matches!(self, SqlDialect::Sqlite)
    }

    /// Statement to run before inserting an explicit ID
    ///
    /// MySQL treats an explicit 0 in an AUTO_INCREMENT column as "generate",
    /// unless NO_AUTO_VALUE_ON_ZERO is set for the session.
    pub fn explicit_id_preamble(&self) -> Option<&'static str> {
        match self {
            SqlDialect::Sqlite => None,
            SqlDialect::MySql => Some(
                "SET SESSION sql_mode = CONCAT_WS(',', NULLIF(@@SESSION.sql_mode, ''), 'NO_AUTO_VALUE_ON_ZERO')",
            ),
        }
    }
}
