//! Input record shapes for song metadata files and event logs.

use super::error::RecordError;
use crate::warehouse::{ArtistRow, SongMatch, SongRow, SongplayRow, UserRow};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Page value of the events that represent a song being played.
pub const PLAY_EVENT_PAGE: &str = "NextSong";

/// One song metadata document. Carries both the song and its artist.
#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

impl SongRecord {
    pub fn song_row(&self) -> SongRow {
        SongRow {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }

    pub fn artist_row(&self) -> ArtistRow {
        ArtistRow {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }
}

/// Raw event-log entry. Everything is optional because non-play events
/// (Home, Login, Logout, ...) leave most fields out.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default, deserialize_with = "lenient_user_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserIdValue {
    Number(i64),
    Text(String),
}

// Logs write userId as a string, and as "" for logged-out events
fn lenient_user_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<UserIdValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(UserIdValue::Number(id)) => Ok(Some(id)),
        Some(UserIdValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(UserIdValue::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid userId: {:?}", text))),
    }
}

impl LogEvent {
    pub fn is_play(&self) -> bool {
        self.page.as_deref() == Some(PLAY_EVENT_PAGE)
    }
}

/// A song-play event with every field the warehouse requires.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    pub ts: i64,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl TryFrom<LogEvent> for PlayEvent {
    type Error = RecordError;

    fn try_from(event: LogEvent) -> Result<Self, Self::Error> {
        Ok(PlayEvent {
            ts: event.ts.ok_or(RecordError::MissingField("ts"))?,
            user_id: event.user_id.ok_or(RecordError::MissingField("userId"))?,
            level: event.level.ok_or(RecordError::MissingField("level"))?,
            session_id: event
                .session_id
                .ok_or(RecordError::MissingField("sessionId"))?,
            first_name: event.first_name,
            last_name: event.last_name,
            gender: event.gender,
            song: event.song,
            artist: event.artist,
            length: event.length,
            location: event.location,
            user_agent: event.user_agent,
        })
    }
}

impl PlayEvent {
    pub fn user_row(&self) -> UserRow {
        UserRow {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }

    /// The (title, artist name, duration) key used to resolve the played song,
    /// if the event carries all three.
    pub fn song_key(&self) -> Option<(&str, &str, f64)> {
        match (&self.song, &self.artist, self.length) {
            (Some(song), Some(artist), Some(length)) => {
                Some((song.as_str(), artist.as_str(), length))
            }
            _ => None,
        }
    }

    pub fn songplay_row(&self, song_match: Option<SongMatch>) -> SongplayRow {
        let (song_id, artist_id) = match song_match {
            Some(found) => (Some(found.song_id), Some(found.artist_id)),
            None => (None, None),
        };
        SongplayRow {
            start_time: self.ts,
            user_id: self.user_id,
            level: self.level.clone(),
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}
