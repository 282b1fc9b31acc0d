use std::sync::Arc;

use time::{Date, UtcOffset};
use tracing::debug;

use crate::error::Result;
use crate::index::{ChainStats, ChainedHashIndex, LinkedStack};
use crate::model::{Post, PostId, TagCount, Timestamp, UserId};
use crate::primitives::sort::sort_by_recency;

use super::metrics::StoreMetrics;
use super::options::StoreOptions;
use super::tags::{extract_tags, TagTable};

/// Entry of an author's post chain: the post id and its slot in the global
/// array.
#[derive(Clone, Copy, Debug)]
struct PostRef {
    id: PostId,
    slot: usize,
}

/// Posts indexed by author plus a global array for full scans and a tag
/// frequency table.
///
/// A post lives in exactly one author chain and exactly one slot of the global
/// array. Post ids are unique per author only; two authors may reuse an id, in
/// which case [`ContentTimeline::post`] returns the earlier one.
pub struct ContentTimeline {
    authors: ChainedHashIndex<LinkedStack<PostRef>>,
    posts: Vec<Post>,
    tags: TagTable,
    trending_limit: usize,
    metrics: Arc<dyn StoreMetrics>,
}

impl ContentTimeline {
    /// Builds an empty timeline sized by `opts.content_buckets`.
    pub fn open(opts: &StoreOptions) -> Result<Self> {
        Ok(Self {
            authors: ChainedHashIndex::with_buckets(opts.content_buckets)?,
            posts: Vec::new(),
            tags: TagTable::new(),
            trending_limit: opts.trending_limit,
            metrics: opts.metrics_or_default(),
        })
    }

    /// Stores `post` and counts its tags.
    ///
    /// Returns `false`, changing nothing, when the author already has a post
    /// with the same id.
    pub fn add_post(&mut self, post: Post) -> bool {
        let duplicate = self
            .authors
            .get(post.author)
            .is_some_and(|chain| chain.iter().any(|entry| entry.id == post.id));
        if duplicate {
            debug!(post = post.id, author = post.author, "content.add_post.rejected_duplicate");
            self.metrics.post_rejected();
            return false;
        }

        let found_tags = extract_tags(&post.message);
        let slot = self.posts.len();
        self.authors.insert_if_absent(post.author, LinkedStack::new);
        if let Some(chain) = self.authors.get_mut(post.author) {
            chain.push_front(PostRef { id: post.id, slot });
        }
        self.posts.push(post);
        for tag in &found_tags {
            let first_sight = self.tags.record(tag);
            self.metrics.tag_recorded(first_sight);
        }
        self.metrics.post_created();
        true
    }

    /// Looks a post up by id with a linear scan of the global array.
    pub fn post(&self, id: PostId) -> Option<Post> {
        self.posts.iter().find(|post| post.id == id).cloned()
    }

    /// Every post, newest first.
    pub fn posts(&self) -> Vec<Post> {
        self.collect(|_| true)
    }

    /// Posts written by `author`, newest first. Empty for unknown authors.
    pub fn posts_by_author(&self, author: UserId) -> Vec<Post> {
        let Some(chain) = self.authors.get(author) else {
            return Vec::new();
        };
        let mut out: Vec<Post> = chain
            .iter()
            .map(|entry| self.posts[entry.slot].clone())
            .collect();
        sort_by_recency(&mut out);
        out
    }

    /// Posts whose message contains `query`, ignoring case, newest first.
    pub fn posts_containing(&self, query: &str) -> Vec<Post> {
        let needle = query.to_lowercase();
        self.collect(|post| post.message.to_lowercase().contains(&needle))
    }

    /// Posts strictly earlier than `before`, newest first.
    pub fn posts_before(&self, before: Timestamp) -> Vec<Post> {
        self.collect(|post| post.posted_at < before)
    }

    /// Posts made on the UTC calendar day `day`, newest first.
    pub fn posts_on(&self, day: Date) -> Vec<Post> {
        self.collect(|post| post.posted_at.to_offset(UtcOffset::UTC).date() == day)
    }

    /// The `limit` most used tags, most frequent first.
    pub fn trending_tags(&self, limit: usize) -> Vec<String> {
        self.trending(limit).into_iter().map(|entry| entry.tag).collect()
    }

    /// [`Self::trending_tags`] with the configured default limit.
    pub fn trending_default(&self) -> Vec<String> {
        self.trending_tags(self.trending_limit)
    }

    /// The `limit` most used tags with their counts.
    pub fn trending(&self, limit: usize) -> Vec<TagCount> {
        self.tags.top(limit)
    }

    /// Global occurrence count of `tag` (expected lower-case, with `#`).
    pub fn tag_count(&self, tag: &str) -> usize {
        self.tags.count(tag)
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Number of authors with at least one post.
    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// Number of distinct tags seen.
    pub fn tag_len(&self) -> usize {
        self.tags.len()
    }

    pub fn index_stats(&self) -> ChainStats {
        self.authors.stats()
    }

    fn collect<P>(&self, keep: P) -> Vec<Post>
    where
        P: Fn(&Post) -> bool,
    {
        let mut out: Vec<Post> = self.posts.iter().filter(|post| keep(*post)).cloned().collect();
        sort_by_recency(&mut out);
        out
    }
}
