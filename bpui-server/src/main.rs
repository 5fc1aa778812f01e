//! bpui-server - web UI for editing the backup plan
//!
//! Picks a storage backend from the command line (CSV file, SQLite or MySQL)
//! and serves the editing UI over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bpui_common::config::{
    MySqlConfig, DEFAULT_PORT, MYSQL_DATABASE_ENV, MYSQL_HOST_ENV, MYSQL_PASS_ENV,
    MYSQL_PORT_ENV, MYSQL_USER_ENV, PORT_ENV,
};
use bpui_common::{CsvSource, DataSource, SqlSource};
use bpui_server::{build_router, AppState};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for bpui-server
#[derive(Parser, Debug)]
#[command(name = "bpui-server")]
#[command(about = "Web UI for editing the backup plan")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = PORT_ENV)]
    port: u16,

    #[command(subcommand)]
    backend: Backend,
}

/// Where the backup plan is stored
#[derive(Subcommand, Debug)]
enum Backend {
    /// CSV file
    Csv {
        /// Path to the CSV file
        path: PathBuf,
    },
    /// SQLite database, created if missing
    Sqlite {
        /// Path to the database file
        path: PathBuf,
    },
    /// MySQL database
    Mysql(MySqlArgs),
}

#[derive(clap::Args, Debug)]
struct MySqlArgs {
    #[arg(long, env = MYSQL_HOST_ENV)]
    host: Option<String>,

    #[arg(long = "db-port", env = MYSQL_PORT_ENV)]
    db_port: Option<String>,

    #[arg(long, env = MYSQL_USER_ENV)]
    user: Option<String>,

    #[arg(long, env = MYSQL_PASS_ENV, hide_env_values = true)]
    password: Option<String>,

    #[arg(long, env = MYSQL_DATABASE_ENV)]
    database: Option<String>,

    /// Table holding the entries
    #[arg(long)]
    table: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bpui_server=info,bpui_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting backup plan UI (bpui-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let source = match open_source(args.backend).await {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to open storage backend: {:#}", e);
            return Err(e);
        }
    };

    let entries = source
        .read_all()
        .await
        .context("Failed to read the backup plan")?;
    info!("✓ Loaded {} entries", entries.len());

    let app = build_router(AppState::new(source));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("bpui-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn open_source(backend: Backend) -> Result<Arc<dyn DataSource>> {
    match backend {
        Backend::Csv { path } => {
            info!("Using CSV file: {}", path.display());
            Ok(Arc::new(CsvSource::new(path)))
        }
        Backend::Sqlite { path } => {
            info!("Using SQLite database: {}", path.display());
            let source = SqlSource::sqlite(&path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            source.create_table().await.context("Failed to create table")?;
            Ok(Arc::new(source))
        }
        Backend::Mysql(args) => {
            let config = MySqlConfig::from_parts(
                args.host,
                args.db_port,
                args.user,
                args.password,
                args.database,
                args.table,
            )?;
            info!(
                "Using MySQL database {} on {}:{}, table {}",
                config.database, config.host, config.port, config.table
            );
            let source = SqlSource::mysql(&config)
                .await
                .context("Failed to connect to MySQL")?;
            source.create_table().await.context("Failed to create table")?;
            Ok(Arc::new(source))
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
