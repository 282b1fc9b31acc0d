use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::index::{ChainStats, ChainedHashIndex, IdTimeline};
use crate::model::{TimelineEntry, Timestamp, UserId};
use crate::primitives::sort::{
    intersect_by_id, peers, sort_by_count, sort_by_id, sort_by_recency, FollowerTally,
};

use super::metrics::StoreMetrics;
use super::options::StoreOptions;

/// Both relationship lists of one user.
#[derive(Debug)]
pub struct UserRelations {
    id: UserId,
    followers: IdTimeline,
    following: IdTimeline,
}

impl UserRelations {
    fn new(id: UserId) -> Self {
        Self {
            id,
            followers: IdTimeline::new(),
            following: IdTimeline::new(),
        }
    }

    /// The user these lists belong to.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Users following this one.
    pub fn followers(&self) -> &IdTimeline {
        &self.followers
    }

    /// Users this one follows.
    pub fn following(&self) -> &IdTimeline {
        &self.following
    }
}

#[derive(Clone, Copy)]
enum Side {
    Followers,
    Following,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Followers => "followers",
            Side::Following => "following",
        }
    }

    fn of(self, relations: &UserRelations) -> &IdTimeline {
        match self {
            Side::Followers => &relations.followers,
            Side::Following => &relations.following,
        }
    }
}

/// Directed, timestamped follow graph.
///
/// Users get a [`UserRelations`] record the first time they appear on either
/// end of an edge. Edges are never removed. Every list query exports a
/// snapshot and sorts it; the returned vectors are owned by the caller.
pub struct RelationshipGraph {
    index: ChainedHashIndex<UserRelations>,
    edges: usize,
    metrics: Arc<dyn StoreMetrics>,
}

impl RelationshipGraph {
    /// Builds an empty graph sized by `opts.relation_buckets`.
    pub fn open(opts: &StoreOptions) -> Result<Self> {
        Ok(Self {
            index: ChainedHashIndex::with_buckets(opts.relation_buckets)?,
            edges: 0,
            metrics: opts.metrics_or_default(),
        })
    }

    /// Creates the edge `follower → followed` at `at`.
    ///
    /// Returns `false` without touching the graph for a self-follow or when the
    /// edge already exists.
    pub fn follow(&mut self, follower: UserId, followed: UserId, at: Timestamp) -> bool {
        if follower == followed {
            debug!(follower, "relations.follow.rejected_self");
            self.metrics.follow_rejected();
            return false;
        }
        if self.is_following(follower, followed) {
            debug!(follower, followed, "relations.follow.rejected_duplicate");
            self.metrics.follow_rejected();
            return false;
        }

        self.index
            .insert_if_absent(follower, || UserRelations::new(follower));
        self.index
            .insert_if_absent(followed, || UserRelations::new(followed));
        if let Some(target) = self.index.get_mut(followed) {
            target.followers.push_front(follower, at);
        }
        if let Some(source) = self.index.get_mut(follower) {
            source.following.push_front(followed, at);
        }
        self.edges += 1;
        self.metrics.follow_created();
        true
    }

    /// `true` when `a` follows `b`, checked from both ends of the edge.
    pub fn is_following(&self, a: UserId, b: UserId) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(source), Some(target)) => {
                source.following.contains(b) && target.followers.contains(a)
            }
            _ => false,
        }
    }

    /// Followers of `id`, most recent follow first. Empty for unknown ids.
    pub fn followers(&self, id: UserId) -> Vec<UserId> {
        let mut entries = self.snapshot(id, Side::Followers);
        sort_by_recency(&mut entries);
        peers(&entries)
    }

    /// Users `id` follows, most recent follow first. Empty for unknown ids.
    pub fn following(&self, id: UserId) -> Vec<UserId> {
        let mut entries = self.snapshot(id, Side::Following);
        sort_by_recency(&mut entries);
        peers(&entries)
    }

    /// Number of followers; equals `followers(id).len()`.
    pub fn follower_count(&self, id: UserId) -> usize {
        self.index
            .get(id)
            .map_or(0, |relations| relations.followers.len())
    }

    /// Number of users `id` follows.
    pub fn following_count(&self, id: UserId) -> usize {
        self.index
            .get(id)
            .map_or(0, |relations| relations.following.len())
    }

    /// Users following both `a` and `b`.
    ///
    /// Each common follower is placed by the later of its two follow times;
    /// the result is newest first.
    pub fn mutual_followers(&self, a: UserId, b: UserId) -> Vec<UserId> {
        self.mutual(a, b, Side::Followers)
    }

    /// Users followed by both `a` and `b`, ordered like [`Self::mutual_followers`].
    pub fn mutual_following(&self, a: UserId, b: UserId) -> Vec<UserId> {
        self.mutual(a, b, Side::Following)
    }

    fn mutual(&self, a: UserId, b: UserId, side: Side) -> Vec<UserId> {
        if !self.index.contains(a) || !self.index.contains(b) {
            return Vec::new();
        }
        let mut left = self.snapshot(a, side);
        let mut right = self.snapshot(b, side);
        sort_by_id(&mut left);
        sort_by_id(&mut right);
        let mut shared = intersect_by_id(&left, &right);
        sort_by_recency(&mut shared);
        peers(&shared)
    }

    /// Every known user ordered by follower count, highest first.
    ///
    /// Users with equal counts come out in no particular order.
    pub fn rank_by_follower_count(&self) -> Vec<UserId> {
        let mut tallies: Vec<FollowerTally> = self
            .index
            .iter()
            .map(|(user, relations)| FollowerTally {
                user,
                followers: relations.followers.len(),
            })
            .collect();
        sort_by_count(&mut tallies);
        tallies.into_iter().map(|tally| tally.user).collect()
    }

    /// Relationship record of `id`, if the user has ever been part of an edge.
    pub fn relations(&self, id: UserId) -> Option<&UserRelations> {
        self.index.get(id)
    }

    /// Users with a relationship record.
    pub fn user_count(&self) -> usize {
        self.index.len()
    }

    /// Follow edges created so far.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Bucket occupancy of the underlying index.
    pub fn index_stats(&self) -> ChainStats {
        self.index.stats()
    }

    fn snapshot(&self, id: UserId, side: Side) -> Vec<TimelineEntry> {
        self.metrics.relation_scan(side.label());
        self.index
            .get(id)
            .map(|relations| side.of(relations).to_vec())
            .unwrap_or_default()
    }
}
