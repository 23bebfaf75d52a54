//! Calendar decomposition of play timestamps.

use super::error::RecordError;
use crate::warehouse::TimeRow;
use chrono::{DateTime, Datelike, Timelike};

impl TimeRow {
    /// Break an epoch-milliseconds timestamp down into its UTC calendar fields.
    pub fn from_millis(start_time: i64) -> Result<Self, RecordError> {
        let instant = DateTime::from_timestamp_millis(start_time)
            .ok_or(RecordError::InvalidTimestamp(start_time))?;

        Ok(TimeRow {
            start_time,
            hour: instant.hour(),
            day: instant.day(),
            week: instant.iso_week().week(),
            month: instant.month(),
            year: instant.year(),
            weekday: instant.format("%A").to_string(),
        })
    }
}
