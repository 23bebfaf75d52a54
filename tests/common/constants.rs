#![allow(dead_code)]

pub const SONG_1_ID: &str = "SOID";
pub const SONG_1_TITLE: &str = "Test";
pub const SONG_1_DURATION: f64 = 5.5;
pub const ARTIST_1_ID: &str = "ARID";
pub const ARTIST_1_NAME: &str = "Band";

pub const SONG_2_ID: &str = "SOUPIRU12A6D4FA1E1";
pub const SONG_2_TITLE: &str = "Der Kleine Dompfaff";
pub const SONG_2_DURATION: f64 = 152.92036;
pub const ARTIST_2_ID: &str = "ARJIE2Y1187B994AB7";
pub const ARTIST_2_NAME: &str = "Line Renaud";

/// 2018-11-02 01:25:34.796 UTC, a Friday in ISO week 44
pub const FRIDAY_TS: i64 = 1541121934796;
