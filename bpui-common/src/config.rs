//! Backend connection configuration
//!
//! MySQL settings come from command-line flags first, then `MYSQL_*`
//! environment variables (clap handles that fallback). Whatever is still
//! missing afterwards is reported in one error so the operator can fix
//! everything at once.

use crate::{Error, Result};

/// Environment variable holding the HTTP port of the UI
pub const PORT_ENV: &str = "BACKUP_PLAN_UI_PORT";

/// Port used when [`PORT_ENV`] is unset
pub const DEFAULT_PORT: u16 = 4000;

/// Table used by the SQL backends unless told otherwise
pub const DEFAULT_TABLE_NAME: &str = "entries";

pub const MYSQL_HOST_ENV: &str = "MYSQL_HOST";
pub const MYSQL_PORT_ENV: &str = "MYSQL_PORT";
pub const MYSQL_USER_ENV: &str = "MYSQL_USER";
pub const MYSQL_PASS_ENV: &str = "MYSQL_PASS";
pub const MYSQL_DATABASE_ENV: &str = "MYSQL_DATABASE";

/// MySQL connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub table: String,
}

impl MySqlConfig {
    /// Assemble a config from optional parts
    ///
    /// Empty strings count as missing. The error lists the environment
    /// variable for every missing part.
    pub fn from_parts(
        host: Option<String>,
        port: Option<String>,
        user: Option<String>,
        password: Option<String>,
        database: Option<String>,
        table: Option<String>,
    ) -> Result<Self> {
        let mut missing = Vec::new();

        let mut require = |value: Option<String>, env_name: &'static str| {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(env_name);
                    String::new()
                }
            }
        };

        let host = require(host, MYSQL_HOST_ENV);
        let port = require(port, MYSQL_PORT_ENV);
        let user = require(user, MYSQL_USER_ENV);
        let password = require(password, MYSQL_PASS_ENV);
        let database = require(database, MYSQL_DATABASE_ENV);

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|e| Error::Config(format!("Invalid {} {:?}: {}", MYSQL_PORT_ENV, port, e)))?;

        let table = table
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            table,
        })
    }

    /// Read every part from the `MYSQL_*` environment variables
    pub fn from_env(table: Option<String>) -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok();

        Self::from_parts(
            var(MYSQL_HOST_ENV),
            var(MYSQL_PORT_ENV),
            var(MYSQL_USER_ENV),
            var(MYSQL_PASS_ENV),
            var(MYSQL_DATABASE_ENV),
            table,
        )
    }

    /// Connection URL for sqlx, with credentials percent-encoded
    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.database
        )
    }
}
