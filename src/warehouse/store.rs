//! SQLite-backed warehouse: owns the single connection of a load run.

use super::models::*;
use super::schema::WAREHOUSE_VERSIONED_SCHEMAS;
use super::statements::*;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use tracing::{debug, info};

/// The analytics database a load run writes into.
///
/// All writes go through a [`LoadTransaction`] borrowed from the warehouse, one
/// per input file.
pub struct Warehouse {
    conn: Connection,
}

fn ensure_schema(conn: &Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = WAREHOUSE_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &WAREHOUSE_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .context("Failed to read database catalog")?;

    if table_count == 0 {
        info!("Creating warehouse db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    // Tables created by hand or by an older tool: accept them if they match the latest layout
    if db_version < BASE_DB_VERSION as i64 {
        latest_schema
            .validate(conn)
            .context("Existing database is not a warehouse database")?;
        conn.pragma_update(None, "user_version", BASE_DB_VERSION + latest_version)?;
        return Ok(());
    }

    let current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version != latest_version {
        bail!(
            "Warehouse db is at version {}, expected version {}",
            current_version,
            latest_version
        );
    }

    latest_schema.validate(conn)
}

fn open_connection(db_path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
            | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
            | rusqlite::OpenFlags::SQLITE_OPEN_URI
            | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open warehouse database {}", db_path.display()))
}

impl Warehouse {
    /// Open (or create) the warehouse database at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = open_connection(db_path)?;
        ensure_schema(&conn)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let warehouse = Warehouse { conn };
        let counts = warehouse.table_counts()?;
        info!(
            "Opened warehouse {}: {} songs, {} artists, {} users, {} songplays",
            db_path.display(),
            counts.songs,
            counts.artists,
            counts.users,
            counts.songplays
        );
        Ok(warehouse)
    }

    /// Open the database at `db_path` and replace whatever warehouse tables it
    /// holds with empty ones, without checking their current layout first.
    pub fn create_fresh<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_connection(db_path.as_ref())?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let mut warehouse = Warehouse { conn };
        warehouse.reset_schema()?;
        Ok(warehouse)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        ensure_schema(&conn)?;
        Ok(Warehouse { conn })
    }

    /// Drop and recreate every warehouse table, discarding all loaded rows.
    pub fn reset_schema(&mut self) -> Result<()> {
        let schema = &WAREHOUSE_VERSIONED_SCHEMAS[WAREHOUSE_VERSIONED_SCHEMAS.len() - 1];
        let tx = self.conn.transaction()?;
        schema.drop(&tx)?;
        schema.create(&tx)?;
        tx.commit()?;
        info!("Warehouse tables dropped and recreated");
        Ok(())
    }

    /// Start the unit of work for one input file. Dropping it without
    /// [`LoadTransaction::commit`] rolls every write back.
    pub fn transaction(&mut self) -> Result<LoadTransaction<'_>> {
        Ok(LoadTransaction {
            tx: self.conn.transaction()?,
        })
    }

    pub fn table_counts(&self) -> Result<TableCounts> {
        let count = |table: &str| -> Result<usize> {
            let rows: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
                    r.get(0)
                })?;
            Ok(rows as usize)
        };
        Ok(TableCounts {
            songplays: count("songplays")?,
            users: count("users")?,
            songs: count("songs")?,
            artists: count("artists")?,
            time: count("time")?,
        })
    }

    /// Raw access for inspection queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Pending writes of one input file.
pub struct LoadTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl LoadTransaction<'_> {
    /// Returns the number of inserted rows, 0 when the song id already exists.
    pub fn insert_song(&self, song: &SongRow) -> Result<usize> {
        let mut stmt = self.tx.prepare_cached(SONG_INSERT)?;
        let changed = stmt
            .execute(params![
                song.song_id,
                song.title,
                song.artist_id,
                song.year,
                song.duration,
            ])
            .with_context(|| format!("Failed to insert song {}", song.song_id))?;
        Ok(changed)
    }

    /// Returns the number of inserted rows, 0 when the artist id already exists.
    pub fn insert_artist(&self, artist: &ArtistRow) -> Result<usize> {
        let mut stmt = self.tx.prepare_cached(ARTIST_INSERT)?;
        let changed = stmt
            .execute(params![
                artist.artist_id,
                artist.name,
                artist.location,
                artist.latitude,
                artist.longitude,
            ])
            .with_context(|| format!("Failed to insert artist {}", artist.artist_id))?;
        Ok(changed)
    }

    pub fn insert_time(&self, time: &TimeRow) -> Result<usize> {
        let mut stmt = self.tx.prepare_cached(TIME_INSERT)?;
        let changed = stmt
            .execute(params![
                time.start_time,
                time.hour,
                time.day,
                time.week,
                time.month,
                time.year,
                time.weekday,
            ])
            .with_context(|| format!("Failed to insert time {}", time.start_time))?;
        Ok(changed)
    }

    /// Insert the user, or only refresh its level if the user id already exists.
    pub fn upsert_user(&self, user: &UserRow) -> Result<usize> {
        let mut stmt = self.tx.prepare_cached(USER_UPSERT)?;
        let changed = stmt
            .execute(params![
                user.user_id,
                user.first_name,
                user.last_name,
                user.gender,
                user.level,
            ])
            .with_context(|| format!("Failed to upsert user {}", user.user_id))?;
        Ok(changed)
    }

    /// Returns the number of inserted rows, 0 when the play was already recorded.
    pub fn insert_songplay(&self, songplay: &SongplayRow) -> Result<usize> {
        let mut stmt = self.tx.prepare_cached(SONGPLAY_INSERT)?;
        let changed = stmt
            .execute(params![
                songplay.start_time,
                songplay.user_id,
                songplay.level,
                songplay.song_id,
                songplay.artist_id,
                songplay.session_id,
                songplay.location,
                songplay.user_agent,
            ])
            .with_context(|| {
                format!(
                    "Failed to insert songplay ({}, {}, {})",
                    songplay.start_time, songplay.user_id, songplay.session_id
                )
            })?;
        Ok(changed)
    }

    /// Look up the song/artist pair matching a played track exactly.
    pub fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongMatch>> {
        let mut stmt = self.tx.prepare_cached(SONG_SELECT)?;
        let found = stmt
            .query_row(params![title, artist_name, duration], |row| {
                Ok(SongMatch {
                    song_id: row.get(0)?,
                    artist_id: row.get(1)?,
                })
            })
            .optional()?;
        Ok(found)
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        debug!("Committed load transaction");
        Ok(())
    }
}
