#![forbid(unsafe_code)]

//! Dataset loading for the `witter` command line tool.

/// CSV import of users, follow edges and posts.
pub mod import;

pub use import::{load_dataset, parse_date, parse_timestamp, DatasetPaths, ImportSummary};
