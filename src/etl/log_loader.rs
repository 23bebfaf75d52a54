//! Loads one event-log file into the time, users and songplays tables.

use super::records::{LogEvent, PlayEvent};
use crate::warehouse::{LoadTransaction, TimeRow};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse the play events of a line-delimited log, in file order.
///
/// Events other than song plays are dropped.
pub fn parse_play_events(content: &str) -> Result<Vec<PlayEvent>> {
    let mut plays = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let event: LogEvent = serde_json::from_str(line)
            .with_context(|| format!("Invalid log event on line {}", line_number))?;
        if !event.is_play() {
            continue;
        }
        let play = PlayEvent::try_from(event)
            .with_context(|| format!("Incomplete play event on line {}", line_number))?;
        plays.push(play);
    }
    Ok(plays)
}

/// Read the event log at `path` and queue its time, user and songplay rows on `tx`.
pub fn process_log_file(tx: &LoadTransaction<'_>, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read log file {}", path.display()))?;
    let plays = parse_play_events(&content)
        .with_context(|| format!("Failed to parse log file {}", path.display()))?;

    for play in &plays {
        let time = TimeRow::from_millis(play.ts)
            .with_context(|| format!("Bad timestamp in log file {}", path.display()))?;
        tx.insert_time(&time)?;
    }

    // Later events win the level of a user, so keep file order here
    for play in &plays {
        tx.upsert_user(&play.user_row())?;
    }

    let mut matched = 0;
    let mut inserted = 0;
    for play in &plays {
        let song_match = match play.song_key() {
            Some((title, artist_name, duration)) => tx.find_song(title, artist_name, duration)?,
            None => None,
        };
        if song_match.is_some() {
            matched += 1;
        }
        inserted += tx.insert_songplay(&play.songplay_row(song_match))?;
    }

    debug!(
        "{}: {} play events, {} songplays inserted, {} matched to a song",
        path.display(),
        plays.len(),
        inserted,
        matched
    );
    Ok(())
}
