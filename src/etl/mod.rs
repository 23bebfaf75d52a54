//! File-to-warehouse loading.
//!
//! Song metadata is loaded first so that play events of the event logs can be
//! resolved against the songs and artists tables:
//! 1. Every song file under the song data root feeds `songs` and `artists`
//! 2. Every event log under the log data root feeds `time`, `users` and `songplays`
//!
//! Each file is committed on its own, a failing file aborts the run.

mod error;
mod log_loader;
mod records;
mod song_loader;
mod time_bucket;
mod walker;

pub use error::RecordError;
pub use log_loader::{parse_play_events, process_log_file};
pub use records::{LogEvent, PlayEvent, SongRecord, PLAY_EVENT_PAGE};
pub use song_loader::process_song_file;
pub use walker::{collect_json_files, process_data, LoadSummary, DATA_FILE_EXTENSION};

use crate::warehouse::Warehouse;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Outcome of a full load run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub songs: LoadSummary,
    pub logs: LoadSummary,
}

/// Load the song tree, then the log tree, into `warehouse`.
pub fn run_load(
    warehouse: &mut Warehouse,
    song_data: &Path,
    log_data: &Path,
) -> Result<RunSummary> {
    info!("Loading song data from {}", song_data.display());
    let songs = process_data(warehouse, song_data, process_song_file)?;

    info!("Loading log data from {}", log_data.display());
    let logs = process_data(warehouse, log_data, process_log_file)?;

    Ok(RunSummary { songs, logs })
}
