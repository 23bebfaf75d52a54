//! Sparkify ETL Library
//!
//! Loads song metadata and event-log dumps into a SQLite play-analytics warehouse.

pub mod config;
pub mod etl;
pub mod sqlite_persistence;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use etl::{run_load, LoadSummary, RunSummary};
pub use warehouse::{LoadTransaction, Warehouse};
