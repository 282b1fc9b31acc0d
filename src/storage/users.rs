use std::sync::Arc;

use tracing::debug;

use crate::model::{Timestamp, User, UserId};
use crate::primitives::sort::sort_by_recency;

use super::metrics::StoreMetrics;
use super::options::StoreOptions;

/// Flat registry of accounts, appended to and scanned linearly.
pub struct UserRegistry {
    users: Vec<User>,
    metrics: Arc<dyn StoreMetrics>,
}

impl UserRegistry {
    pub fn open(opts: &StoreOptions) -> Self {
        Self {
            users: Vec::new(),
            metrics: opts.metrics_or_default(),
        }
    }

    /// Appends `user`. Returns `false`, changing nothing, if the id is taken.
    pub fn add_user(&mut self, user: User) -> bool {
        if self.users.iter().any(|known| known.id == user.id) {
            debug!(user = user.id, "users.add.rejected_duplicate");
            return false;
        }
        self.users.push(user);
        self.metrics.user_created();
        true
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.iter().find(|user| user.id == id).cloned()
    }

    /// All users, most recently joined first.
    pub fn users(&self) -> Vec<User> {
        self.collect(|_| true)
    }

    /// Users whose name contains `query`, ignoring case, newest first.
    pub fn users_containing(&self, query: &str) -> Vec<User> {
        let needle = query.to_lowercase();
        self.collect(|user| user.name.to_lowercase().contains(&needle))
    }

    /// Users who joined strictly before `before`, newest first.
    pub fn users_joined_before(&self, before: Timestamp) -> Vec<User> {
        self.collect(|user| user.joined < before)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn collect<P>(&self, keep: P) -> Vec<User>
    where
        P: Fn(&User) -> bool,
    {
        let mut out: Vec<User> = self.users.iter().filter(|user| keep(*user)).cloned().collect();
        sort_by_recency(&mut out);
        out
    }
}
