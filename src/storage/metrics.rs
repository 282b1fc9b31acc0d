use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Trait for tracking write outcomes and scans performed by the stores.
///
/// Implementations receive a callback for every accepted or rejected write and
/// for every relationship list exported for a query. The stores call these
/// hooks synchronously, so implementations should be cheap.
pub trait StoreMetrics: Send + Sync {
    /// Records a follow edge that was created.
    fn follow_created(&self);

    /// Records a follow attempt that was rejected (self-follow or duplicate).
    fn follow_rejected(&self);

    /// Records a post that was stored.
    fn post_created(&self);

    /// Records a post rejected because its author already used the id.
    fn post_rejected(&self);

    /// Records a user added to the registry.
    fn user_created(&self);

    /// Records a tag occurrence.
    ///
    /// # Parameters
    /// * `first_sight` - `true` when the tag was not known before this post.
    fn tag_recorded(&self, first_sight: bool);

    /// Records a relationship list export.
    ///
    /// # Parameters
    /// * `direction` - `"followers"` or `"following"`.
    fn relation_scan(&self, direction: &'static str);
}

/// A no-op implementation of [`StoreMetrics`] that discards everything.
#[derive(Default)]
pub struct NoopMetrics;

impl StoreMetrics for NoopMetrics {
    fn follow_created(&self) {}
    fn follow_rejected(&self) {}
    fn post_created(&self) {}
    fn post_rejected(&self) {}
    fn user_created(&self) {}
    fn tag_recorded(&self, _first_sight: bool) {}
    fn relation_scan(&self, _direction: &'static str) {}
}

/// Atomic counter implementation of [`StoreMetrics`].
#[derive(Default)]
pub struct CounterMetrics {
    /// Follow edges created.
    pub follows_created: AtomicU64,
    /// Follow attempts rejected.
    pub follows_rejected: AtomicU64,
    /// Posts stored.
    pub posts_created: AtomicU64,
    /// Posts rejected as duplicates.
    pub posts_rejected: AtomicU64,
    /// Users registered.
    pub users_created: AtomicU64,
    /// Tag occurrences recorded.
    pub tags_recorded: AtomicU64,
    /// Distinct tags first seen.
    pub tags_distinct: AtomicU64,
    /// Follower list exports.
    pub follower_scans: AtomicU64,
    /// Following list exports.
    pub following_scans: AtomicU64,
}

impl StoreMetrics for CounterMetrics {
    fn follow_created(&self) {
        self.follows_created.fetch_add(1, Ordering::Relaxed);
    }

    fn follow_rejected(&self) {
        self.follows_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn post_created(&self) {
        self.posts_created.fetch_add(1, Ordering::Relaxed);
    }

    fn post_rejected(&self) {
        self.posts_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn user_created(&self) {
        self.users_created.fetch_add(1, Ordering::Relaxed);
    }

    fn tag_recorded(&self, first_sight: bool) {
        self.tags_recorded.fetch_add(1, Ordering::Relaxed);
        if first_sight {
            self.tags_distinct.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn relation_scan(&self, direction: &'static str) {
        match direction {
            "followers" => {
                self.follower_scans.fetch_add(1, Ordering::Relaxed);
            }
            "following" => {
                self.following_scans.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }
}

/// Returns the default metrics implementation, [`NoopMetrics`].
pub fn default_metrics() -> Arc<dyn StoreMetrics> {
    Arc::new(NoopMetrics)
}
