//! Warehouse reset tool
//!
//! Drops and recreates every table of a warehouse database, leaving it empty
//! for a fresh load.

use anyhow::Result;
use clap::Parser;
use sparkify_etl::config::DEFAULT_DB_PATH;
use sparkify_etl::Warehouse;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "create-tables")]
#[command(about = "Drop and recreate the analytics warehouse tables")]
struct Args {
    /// Path to the SQLite warehouse database file
    #[arg(value_name = "DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Resetting warehouse at {}", args.db_path.display());
    let warehouse = Warehouse::create_fresh(&args.db_path)?;

    let counts = warehouse.table_counts()?;
    info!(
        "Tables recreated: {} songs, {} artists, {} users, {} time rows, {} songplays",
        counts.songs, counts.artists, counts.users, counts.time, counts.songplays
    );
    Ok(())
}
