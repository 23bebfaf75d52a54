//! Data tree fixtures and warehouse inspection helpers.

#![allow(dead_code)]

use serde_json::{json, Value};
use sparkify_etl::{run_load, RunSummary, Warehouse};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a song tree, a log tree and a database path.
pub struct TestData {
    pub dir: TempDir,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub db_path: PathBuf,
}

impl TestData {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let song_data = dir.path().join("data").join("song_data");
        let log_data = dir.path().join("data").join("log_data");
        fs::create_dir_all(&song_data).unwrap();
        fs::create_dir_all(&log_data).unwrap();
        let db_path = dir.path().join("sparkifydb.sqlite");
        TestData {
            dir,
            song_data,
            log_data,
            db_path,
        }
    }

    /// Write a song file holding `doc` at `relative` under the song root.
    pub fn add_song(&self, relative: &str, doc: &Value) -> PathBuf {
        write_file(&self.song_data, relative, &doc.to_string())
    }

    /// Write a line-delimited log file at `relative` under the log root.
    pub fn add_log(&self, relative: &str, events: &[Value]) -> PathBuf {
        let lines: Vec<String> = events.iter().map(Value::to_string).collect();
        write_file(&self.log_data, relative, &lines.join("\n"))
    }

    pub fn add_raw_log(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.log_data, relative, content)
    }

    pub fn open_warehouse(&self) -> Warehouse {
        Warehouse::open(&self.db_path).unwrap()
    }

    pub fn run(&self, warehouse: &mut Warehouse) -> RunSummary {
        run_load(warehouse, &self.song_data, &self.log_data).unwrap()
    }
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// A song metadata document in the layout of the song dataset.
pub fn song_doc(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
) -> Value {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 0
    })
}

/// A NextSong event in the layout of the event log dataset.
pub fn play_event(
    ts: i64,
    user_id: i64,
    level: &str,
    session_id: i64,
    song: &str,
    artist: &str,
    length: f64,
) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Kaylee",
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Summers",
        "length": length,
        "level": level,
        "location": "Phoenix-Mesa-Scottsdale, AZ",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1540344794796.0,
        "sessionId": session_id,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (Windows NT 6.1; WOW64)",
        "userId": user_id.to_string()
    })
}

/// A non-play event (Home, Login, Logout, ...).
pub fn page_event(page: &str, ts: i64, user_id: Option<i64>, session_id: i64) -> Value {
    json!({
        "artist": null,
        "auth": if user_id.is_some() { "Logged In" } else { "Logged Out" },
        "firstName": null,
        "gender": null,
        "itemInSession": 0,
        "lastName": null,
        "length": null,
        "level": "free",
        "location": null,
        "method": "GET",
        "page": page,
        "registration": null,
        "sessionId": session_id,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": null,
        "userId": user_id.map(|id| id.to_string()).unwrap_or_default()
    })
}

/// (start_time, user_id, level, song_id, artist_id, session_id) of every songplay.
pub type SongplaySnapshot = (i64, i64, String, Option<String>, Option<String>, i64);

pub fn songplays(warehouse: &Warehouse) -> Vec<SongplaySnapshot> {
    warehouse
        .connection()
        .prepare(
            "SELECT start_time, user_id, level, song_id, artist_id, session_id
             FROM songplays ORDER BY start_time, user_id, session_id",
        )
        .unwrap()
        .query_map([], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
        })
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
}

pub fn user_level(warehouse: &Warehouse, user_id: i64) -> Option<String> {
    warehouse
        .connection()
        .query_row(
            "SELECT level FROM users WHERE user_id = ?1",
            [user_id],
            |r| r.get(0),
        )
        .ok()
}

/// Every row of every table rendered as text, in a stable order.
pub fn dump_tables(warehouse: &Warehouse) -> Vec<String> {
    let queries = [
        "SELECT 'song', song_id, title, artist_id, year, duration FROM songs ORDER BY song_id",
        "SELECT 'artist', artist_id, name, location, latitude, longitude FROM artists ORDER BY artist_id",
        "SELECT 'user', user_id, first_name, last_name, gender, level FROM users ORDER BY user_id",
        "SELECT 'time', start_time, hour, day, week, month || '/' || year || '/' || weekday FROM time ORDER BY start_time",
        "SELECT 'songplay', start_time, user_id, session_id, song_id, artist_id FROM songplays ORDER BY start_time, user_id, session_id",
    ];
    let mut rows = Vec::new();
    for query in queries {
        let mut stmt = warehouse.connection().prepare(query).unwrap();
        let table_rows = stmt
            .query_map([], |r| {
                let mut fields = Vec::new();
                for i in 0..6 {
                    let value: rusqlite::types::Value = r.get(i)?;
                    fields.push(format!("{:?}", value));
                }
                Ok(fields.join("|"))
            })
            .unwrap()
            .map(|r| r.unwrap());
        rows.extend(table_rows);
    }
    rows
}
