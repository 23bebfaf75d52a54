mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = "sparkifydb.sqlite";
pub const DEFAULT_SONG_DATA_DIR: &str = "data/song_data";
pub const DEFAULT_LOG_DATA_DIR: &str = "data/log_data";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    pub reset_schema: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            song_data_dir: PathBuf::from(DEFAULT_SONG_DATA_DIR),
            log_data_dir: PathBuf::from(DEFAULT_LOG_DATA_DIR),
            reset_schema: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    pub reset_schema: bool,
}

// Relative paths resolve against the working directory, wherever they were configured
fn absolute_path(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()
        .with_context(|| format!("Error resolving path: {:?}", path))?;
    Ok(cwd.join(path))
}

fn check_data_dir(name: &str, dir: &Path) -> Result<()> {
    // A missing data root just means nothing to load
    if dir.exists() && !dir.is_dir() {
        bail!("{} is not a directory: {:?}", name, dir);
    }
    Ok(())
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = absolute_path(
            file.db_path
                .map(PathBuf::from)
                .unwrap_or_else(|| cli.db_path.clone()),
        )?;
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let song_data_dir = absolute_path(
            file.song_data_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| cli.song_data_dir.clone()),
        )?;
        check_data_dir("song_data_dir", &song_data_dir)?;

        let log_data_dir = absolute_path(
            file.log_data_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| cli.log_data_dir.clone()),
        )?;
        check_data_dir("log_data_dir", &log_data_dir)?;

        let reset_schema = file.reset_schema.unwrap_or(cli.reset_schema);

        Ok(Self {
            db_path,
            song_data_dir,
            log_data_dir,
            reset_schema,
        })
    }
}
