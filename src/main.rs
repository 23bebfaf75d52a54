use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_DB_PATH, DEFAULT_LOG_DATA_DIR,
    DEFAULT_SONG_DATA_DIR,
};
use sparkify_etl::{run_load, Warehouse};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().with_context(|| format!("Error resolving path: {}", s))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song metadata and event logs into the analytics warehouse")]
struct CliArgs {
    /// Path to the SQLite warehouse database file.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Root of the song metadata tree.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_SONG_DATA_DIR)]
    pub song_data: PathBuf,

    /// Root of the event log tree.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_LOG_DATA_DIR)]
    pub log_data: PathBuf,

    /// Drop and recreate all warehouse tables before loading.
    #[clap(long, default_value_t = false)]
    pub reset_schema: bool,

    /// Optional TOML config file, its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Reading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        db_path: cli_args.db_path,
        song_data_dir: cli_args.song_data,
        log_data_dir: cli_args.log_data,
        reset_schema: cli_args.reset_schema,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening warehouse at {:?}...", config.db_path);
    let mut warehouse = if config.reset_schema {
        Warehouse::create_fresh(&config.db_path)?
    } else {
        Warehouse::open(&config.db_path)?
    };

    let summary = run_load(&mut warehouse, &config.song_data_dir, &config.log_data_dir)?;

    let counts = warehouse.table_counts()?;
    info!("");
    info!("Load Summary");
    info!("============");
    info!(
        "Song files processed: {}/{}",
        summary.songs.processed, summary.songs.found
    );
    info!(
        "Log files processed: {}/{}",
        summary.logs.processed, summary.logs.found
    );
    info!("Warehouse contains:");
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} users", counts.users);
    info!("  {} time rows", counts.time);
    info!("  {} songplays", counts.songplays);

    Ok(())
}
