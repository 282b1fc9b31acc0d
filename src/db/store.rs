use serde::Serialize;
use time::Date;
use tracing::info;

use crate::error::Result;
use crate::index::ChainStats;
use crate::model::{Post, PostId, TagCount, Timestamp, User, UserId};
use crate::storage::{ContentTimeline, RelationshipGraph, StoreOptions, UserRegistry};

/// Counts and index shape of a [`SocialStore`].
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    /// Registered users.
    pub users: usize,
    /// Users that appear on either end of a follow edge.
    pub related_users: usize,
    /// Follow edges.
    pub follows: usize,
    /// Stored posts.
    pub posts: usize,
    /// Users with at least one post.
    pub authors: usize,
    /// Distinct hashtags seen.
    pub tags: usize,
    /// Bucket occupancy of the relationship index.
    pub relation_index: ChainStats,
    /// Bucket occupancy of the author index.
    pub content_index: ChainStats,
}

/// An in-memory social data store.
///
/// Owns one [`UserRegistry`], one [`RelationshipGraph`] and one
/// [`ContentTimeline`], built from the same [`StoreOptions`]. The three parts
/// do not cross-check each other: a follow or post may name a user that was
/// never registered.
///
/// # Examples
///
/// ```
/// use time::macros::datetime;
/// use witter::db::SocialStore;
/// use witter::storage::StoreOptions;
///
/// let mut store = SocialStore::open(StoreOptions::default())?;
/// store.follow(1, 2, datetime!(2020-01-01 0:00 UTC));
/// store.follow(1, 3, datetime!(2020-01-02 0:00 UTC));
/// assert_eq!(store.following(1), vec![3, 2]);
/// # Ok::<(), witter::WitterError>(())
/// ```
pub struct SocialStore {
    options: StoreOptions,
    users: UserRegistry,
    graph: RelationshipGraph,
    content: ContentTimeline,
}

impl SocialStore {
    /// Validates `options` and builds an empty store.
    pub fn open(options: StoreOptions) -> Result<Self> {
        options.validate()?;
        let graph = RelationshipGraph::open(&options)?;
        let content = ContentTimeline::open(&options)?;
        let users = UserRegistry::open(&options);
        info!(
            relation_buckets = options.relation_buckets,
            content_buckets = options.content_buckets,
            "store.open"
        );
        Ok(Self {
            options,
            users,
            graph,
            content,
        })
    }

    /// Options the store was opened with.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn content(&self) -> &ContentTimeline {
        &self.content
    }

    // Users

    /// See [`UserRegistry::add_user`].
    pub fn add_user(&mut self, user: User) -> bool {
        self.users.add_user(user)
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.user(id)
    }

    pub fn all_users(&self) -> Vec<User> {
        self.users.users()
    }

    pub fn users_containing(&self, query: &str) -> Vec<User> {
        self.users.users_containing(query)
    }

    pub fn users_joined_before(&self, before: Timestamp) -> Vec<User> {
        self.users.users_joined_before(before)
    }

    // Relationships

    /// See [`RelationshipGraph::follow`].
    pub fn follow(&mut self, follower: UserId, followed: UserId, at: Timestamp) -> bool {
        self.graph.follow(follower, followed, at)
    }

    pub fn is_following(&self, a: UserId, b: UserId) -> bool {
        self.graph.is_following(a, b)
    }

    pub fn followers(&self, id: UserId) -> Vec<UserId> {
        self.graph.followers(id)
    }

    pub fn following(&self, id: UserId) -> Vec<UserId> {
        self.graph.following(id)
    }

    pub fn follower_count(&self, id: UserId) -> usize {
        self.graph.follower_count(id)
    }

    pub fn following_count(&self, id: UserId) -> usize {
        self.graph.following_count(id)
    }

    pub fn mutual_followers(&self, a: UserId, b: UserId) -> Vec<UserId> {
        self.graph.mutual_followers(a, b)
    }

    pub fn mutual_following(&self, a: UserId, b: UserId) -> Vec<UserId> {
        self.graph.mutual_following(a, b)
    }

    pub fn rank_by_follower_count(&self) -> Vec<UserId> {
        self.graph.rank_by_follower_count()
    }

    // Posts

    /// See [`ContentTimeline::add_post`].
    pub fn add_post(&mut self, post: Post) -> bool {
        self.content.add_post(post)
    }

    pub fn post(&self, id: PostId) -> Option<Post> {
        self.content.post(id)
    }

    pub fn posts(&self) -> Vec<Post> {
        self.content.posts()
    }

    pub fn posts_by_author(&self, author: UserId) -> Vec<Post> {
        self.content.posts_by_author(author)
    }

    pub fn posts_containing(&self, query: &str) -> Vec<Post> {
        self.content.posts_containing(query)
    }

    pub fn posts_before(&self, before: Timestamp) -> Vec<Post> {
        self.content.posts_before(before)
    }

    pub fn posts_on(&self, day: Date) -> Vec<Post> {
        self.content.posts_on(day)
    }

    pub fn trending_tags(&self, limit: usize) -> Vec<String> {
        self.content.trending_tags(limit)
    }

    pub fn trending(&self, limit: usize) -> Vec<TagCount> {
        self.content.trending(limit)
    }

    pub fn tag_count(&self, tag: &str) -> usize {
        self.content.tag_count(tag)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            users: self.users.len(),
            related_users: self.graph.user_count(),
            follows: self.graph.edge_count(),
            posts: self.content.len(),
            authors: self.content.author_count(),
            tags: self.content.tag_len(),
            relation_index: self.graph.index_stats(),
            content_index: self.content.index_stats(),
        }
    }
}

impl std::fmt::Debug for SocialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialStore")
            .field("options", &self.options)
            .field("users", &self.users.len())
            .field("follows", &self.graph.edge_count())
            .field("posts", &self.content.len())
            .finish()
    }
}
