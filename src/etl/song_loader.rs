//! Loads one song metadata file into the songs and artists tables.

use super::error::RecordError;
use super::records::SongRecord;
use crate::warehouse::LoadTransaction;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read the song record of `path` and queue its song and artist rows on `tx`.
///
/// Only the first record of the file is used; song files hold exactly one.
pub fn process_song_file(tx: &LoadTransaction<'_>, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read song file {}", path.display()))?;
    let record = first_song_record(&content)
        .with_context(|| format!("Failed to parse song file {}", path.display()))?;

    let songs_inserted = tx.insert_song(&record.song_row())?;
    let artists_inserted = tx.insert_artist(&record.artist_row())?;
    debug!(
        "{}: {} song(s), {} artist(s) inserted",
        path.display(),
        songs_inserted,
        artists_inserted
    );
    Ok(())
}

/// Parses the first JSON value of a song file, which may be a single object
/// or a sequence of line-delimited objects.
fn first_song_record(content: &str) -> Result<SongRecord, RecordError> {
    let mut records = serde_json::Deserializer::from_str(content).into_iter::<SongRecord>();
    match records.next() {
        Some(record) => Ok(record?),
        None => Err(RecordError::EmptySongFile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::Warehouse;
    use std::fs;
    use tempfile::TempDir;

    const SONG_JSON: &str = r#"{"num_songs": 1, "artist_id": "ARID", "artist_latitude": 35.14968, "artist_longitude": -90.04892, "artist_location": "Memphis, TN", "artist_name": "Band", "song_id": "SOID", "title": "Test", "duration": 5.5, "year": 1999}"#;

    #[test]
    fn test_first_record_of_json_lines() {
        let content = format!(
            "{}\n{}\n",
            SONG_JSON,
            SONG_JSON.replace("SOID", "SOTHER")
        );
        let record = first_song_record(&content).unwrap();
        assert_eq!(record.song_id, "SOID");
    }

    #[test]
    fn test_empty_file_is_an_error() {
        assert!(matches!(
            first_song_record("  \n"),
            Err(RecordError::EmptySongFile)
        ));
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let result = first_song_record(r#"{"song_id": "SOID", "title": "Test"}"#);
        assert!(matches!(result, Err(RecordError::Json(_))));
    }

    #[test]
    fn test_process_song_file_writes_song_and_artist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("TRAAAAW128F429D538.json");
        fs::write(&path, SONG_JSON).unwrap();

        let mut warehouse = Warehouse::open_in_memory().unwrap();
        let tx = warehouse.transaction().unwrap();
        process_song_file(&tx, &path).unwrap();
        tx.commit().unwrap();

        let (title, artist_id, year, duration): (String, String, i32, f64) = warehouse
            .connection()
            .query_row(
                "SELECT title, artist_id, year, duration FROM songs WHERE song_id = 'SOID'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .unwrap();
        assert_eq!(
            (title.as_str(), artist_id.as_str(), year, duration),
            ("Test", "ARID", 1999, 5.5)
        );

        let (name, location, latitude): (String, String, f64) = warehouse
            .connection()
            .query_row(
                "SELECT name, location, latitude FROM artists WHERE artist_id = 'ARID'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(name, "Band");
        assert_eq!(location, "Memphis, TN");
        assert_eq!(latitude, 35.14968);
    }

    #[test]
    fn test_process_song_file_leaves_commit_to_caller() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.json");
        fs::write(&path, SONG_JSON).unwrap();

        let mut warehouse = Warehouse::open_in_memory().unwrap();
        {
            let tx = warehouse.transaction().unwrap();
            process_song_file(&tx, &path).unwrap();
        }
        assert_eq!(warehouse.table_counts().unwrap().songs, 0);
    }
}
