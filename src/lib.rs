//! In-memory data layer for a small social micro-blogging service.
//!
//! Users follow each other with timestamped, directed edges and publish short
//! posts ("weets") carrying hashtags. The crate answers follower/following
//! lists, mutual relationships, post search and trending tags from fixed-size
//! chained hash indexes and explicit quicksorts over exported snapshots.

#![warn(missing_docs)]

pub mod cli;
pub mod db;
pub mod error;
pub mod index;
pub mod model;
pub mod primitives;
pub mod storage;

pub use db::{SharedStore, SocialStore, StoreStats};
pub use error::{Result, WitterError};
pub use model::{Post, PostId, TagCount, Timestamp, User, UserId};
pub use storage::StoreOptions;
