//! Parameterized statements executed against the warehouse tables.

pub const SONGPLAY_INSERT: &str = "INSERT INTO songplays
    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT (start_time, user_id, session_id) DO NOTHING";

// Only the subscription level follows the latest event, names and gender stay as first seen
pub const USER_UPSERT: &str = "INSERT INTO users (user_id, first_name, last_name, gender, level)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT (user_id) DO UPDATE SET level = excluded.level";

pub const SONG_INSERT: &str = "INSERT INTO songs (song_id, title, artist_id, year, duration)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT (song_id) DO NOTHING";

pub const ARTIST_INSERT: &str = "INSERT INTO artists (artist_id, name, location, latitude, longitude)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT (artist_id) DO NOTHING";

pub const TIME_INSERT: &str = "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT (start_time) DO NOTHING";

/// Resolves a played track to its (song_id, artist_id) pair.
///
/// Exact match on title, artist name and duration; the join means a song whose
/// artist row was never loaded does not match.
pub const SONG_SELECT: &str = "SELECT s.song_id, a.artist_id
    FROM songs s JOIN artists a ON s.artist_id = a.artist_id
    WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
    LIMIT 1";
