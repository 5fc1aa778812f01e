//! bpui-convert - move a CSV backup plan into SQLite or MySQL

use std::path::PathBuf;

use anyhow::{Context, Result};
use bpui_common::config::{
    MySqlConfig, MYSQL_DATABASE_ENV, MYSQL_HOST_ENV, MYSQL_PASS_ENV, MYSQL_PORT_ENV,
    MYSQL_USER_ENV,
};
use bpui_convert::{convert_csv_to_mysql, convert_csv_to_sqlite};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for bpui-convert
#[derive(Parser, Debug)]
#[command(name = "bpui-convert")]
#[command(about = "Convert a CSV backup plan into a SQL database")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    target: Target,
}

#[derive(Subcommand, Debug)]
enum Target {
    /// Write into an SQLite database file
    Sqlite {
        /// CSV file to read
        csv: PathBuf,
        /// Database file, created if missing
        sqlite: PathBuf,
    },
    /// Write into MySQL, replacing the table if it exists
    Mysql {
        /// CSV file to read
        csv: PathBuf,
        /// Table to write (default: entries)
        table: Option<String>,

        #[arg(long, env = MYSQL_HOST_ENV)]
        host: Option<String>,

        #[arg(long, env = MYSQL_PORT_ENV)]
        port: Option<String>,

        #[arg(long, env = MYSQL_USER_ENV)]
        user: Option<String>,

        #[arg(long, env = MYSQL_PASS_ENV, hide_env_values = true)]
        password: Option<String>,

        #[arg(long, env = MYSQL_DATABASE_ENV)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bpui_convert=info,bpui_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.target).await {
        error!("Data conversion failed: {:#}", e);
        return Err(e);
    }

    println!("Data conversion was successful.");
    Ok(())
}

async fn run(target: Target) -> Result<()> {
    let written = match target {
        Target::Sqlite { csv, sqlite } => convert_csv_to_sqlite(&csv, &sqlite)
            .await
            .with_context(|| {
                format!("Failed to convert {} to {}", csv.display(), sqlite.display())
            })?,
        Target::Mysql {
            csv,
            table,
            host,
            port,
            user,
            password,
            database,
        } => {
            let config = MySqlConfig::from_parts(host, port, user, password, database, table)?;
            convert_csv_to_mysql(&csv, &config)
                .await
                .with_context(|| format!("Failed to convert {} to MySQL", csv.display()))?
        }
    };

    info!("✓ Wrote {} entries", written);
    Ok(())
}
