//! Common test infrastructure
//!
//! Builds song and log data trees in a temporary directory and inspects the
//! warehouse after a load.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{song_doc, TestData};
//!
//! #[test]
//! fn test_load_one_song() {
//!     let data = TestData::new();
//!     data.add_song("A/A/A/TRA.json", &song_doc("SOID", "Test", "ARID", "Band", 5.5));
//!     let mut warehouse = data.open_warehouse();
//!     data.run(&mut warehouse);
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::*;
