use std::sync::Arc;

use crate::error::{Result, WitterError};
use crate::index::{DEFAULT_CONTENT_BUCKETS, DEFAULT_RELATION_BUCKETS};

use super::metrics::{default_metrics, StoreMetrics};

/// Number of tags returned by trending queries when no limit is given.
pub const DEFAULT_TRENDING_LIMIT: usize = 10;

/// Configuration options supplied when opening a [`crate::db::SocialStore`].
///
/// Bucket counts are fixed for the lifetime of a store. Pick them from the
/// expected number of distinct ids; the indexes never grow.
#[derive(Clone)]
pub struct StoreOptions {
    /// Buckets in the user id → relationships index.
    pub relation_buckets: usize,
    /// Buckets in the author id → posts index.
    pub content_buckets: usize,
    /// Default number of tags returned by trending queries.
    pub trending_limit: usize,
    /// Optional metrics sink; defaults to [`super::NoopMetrics`].
    pub metrics: Option<Arc<dyn StoreMetrics>>,
}

impl StoreOptions {
    /// Creates options with the default bucket counts.
    pub fn new() -> Self {
        Self {
            relation_buckets: DEFAULT_RELATION_BUCKETS,
            content_buckets: DEFAULT_CONTENT_BUCKETS,
            trending_limit: DEFAULT_TRENDING_LIMIT,
            metrics: None,
        }
    }

    /// Sets the relationship index bucket count.
    pub fn relation_buckets(mut self, buckets: usize) -> Self {
        self.relation_buckets = buckets;
        self
    }

    /// Sets the content index bucket count.
    pub fn content_buckets(mut self, buckets: usize) -> Self {
        self.content_buckets = buckets;
        self
    }

    /// Sets the default trending limit.
    pub fn trending_limit(mut self, limit: usize) -> Self {
        self.trending_limit = limit;
        self
    }

    /// Sets the metrics collection implementation.
    pub fn metrics(mut self, metrics: Arc<dyn StoreMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Rejects bucket counts of zero.
    pub fn validate(&self) -> Result<()> {
        if self.relation_buckets == 0 {
            return Err(WitterError::InvalidArgument(
                "relation_buckets must be at least 1".into(),
            ));
        }
        if self.content_buckets == 0 {
            return Err(WitterError::InvalidArgument(
                "content_buckets must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn metrics_or_default(&self) -> Arc<dyn StoreMetrics> {
        self.metrics.clone().unwrap_or_else(default_metrics)
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreOptions")
            .field("relation_buckets", &self.relation_buckets)
            .field("content_buckets", &self.content_buckets)
            .field("trending_limit", &self.trending_limit)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
