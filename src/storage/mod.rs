//! In-memory social stores.
//!
//! Three independent stores share the hash index and sorting primitives: the
//! follow graph, the post timeline with its tag table, and the flat user
//! registry. Each one is single-threaded; see [`crate::db::SharedStore`] for
//! concurrent access.

/// Post storage indexed by author, with search and trending tags.
pub mod content;

/// Directed follow graph with timestamped edges.
pub mod relations;

/// Hashtag extraction and the global tag frequency table.
pub mod tags;

/// Flat registry of user accounts.
pub mod users;

mod metrics;
mod options;

pub use content::ContentTimeline;
pub use metrics::{default_metrics, CounterMetrics, NoopMetrics, StoreMetrics};
pub use options::{StoreOptions, DEFAULT_TRENDING_LIMIT};
pub use relations::{RelationshipGraph, UserRelations};
pub use tags::{extract_tags, TagTable};
pub use users::UserRegistry;
