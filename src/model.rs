use serde::Serialize;
use time::OffsetDateTime;

/// Identifier of a user. Hashing uses the absolute value, so negative ids are
/// accepted even though the platform only hands out non-negative ones.
pub type UserId = i64;
/// Identifier of a post (weet).
pub type PostId = i64;
/// Point in time attached to follows, posts and registrations.
pub type Timestamp = OffsetDateTime;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub joined: Timestamp,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, joined: Timestamp) -> Self {
        Self {
            id,
            name: name.into(),
            joined,
        }
    }
}

/// A short timestamped message. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub posted_at: Timestamp,
}

impl Post {
    pub fn new(id: PostId, author: UserId, message: impl Into<String>, posted_at: Timestamp) -> Self {
        Self {
            id,
            author,
            message: message.into(),
            posted_at,
        }
    }
}

/// A directed follow relationship as seen from one side: the peer on the other
/// end and when the edge was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub peer: UserId,
    pub at: Timestamp,
}

impl TimelineEntry {
    pub fn new(peer: UserId, at: Timestamp) -> Self {
        Self { peer, at }
    }
}

/// A hashtag and how many times it has been seen across all posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}
