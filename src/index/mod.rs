//! In-memory index structures backing the stores.
//!
//! Everything here is hand-built on top of a single singly-linked list type:
//! hash buckets are chains of keyed slots and relationship timelines are chains
//! of `(peer, timestamp)` pairs.

/// Fixed-bucket chained hash index keyed by integer ids.
pub mod chained;
/// Head-insertion singly-linked list.
pub mod list;
/// Per-user relationship lists.
pub mod timeline;

pub use chained::{
    ChainStats, ChainedHashIndex, DEFAULT_CONTENT_BUCKETS, DEFAULT_RELATION_BUCKETS,
};
pub use list::LinkedStack;
pub use timeline::IdTimeline;
