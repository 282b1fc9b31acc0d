//! Ordering and intersection routines applied to index snapshots.
//!
//! The quicksort family below is in place and not stable: elements with equal
//! keys come out in no particular order. Every routine accepts empty input.

use std::cmp::Ordering;

use crate::model::{Post, TagCount, TimelineEntry, Timestamp, User, UserId};

/// Types carrying the timestamp used for newest-first ordering.
pub trait Chronological {
    /// The instant the item is ordered by.
    fn timestamp(&self) -> Timestamp;
}

impl Chronological for TimelineEntry {
    fn timestamp(&self) -> Timestamp {
        self.at
    }
}

impl Chronological for Post {
    fn timestamp(&self) -> Timestamp {
        self.posted_at
    }
}

impl Chronological for User {
    fn timestamp(&self) -> Timestamp {
        self.joined
    }
}

/// Types ranked by an occurrence count, highest first.
pub trait Tallied {
    /// The count the item is ranked by.
    fn tally(&self) -> usize;
}

impl Tallied for TagCount {
    fn tally(&self) -> usize {
        self.count
    }
}

/// A user paired with its follower count, produced when ranking the graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FollowerTally {
    pub user: UserId,
    pub followers: usize,
}

impl Tallied for FollowerTally {
    fn tally(&self) -> usize {
        self.followers
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// `true` when `a` belongs strictly before `b`.
    fn precedes<K: Ord>(self, a: &K, b: &K) -> bool {
        match (self, a.cmp(b)) {
            (Direction::Ascending, Ordering::Less) => true,
            (Direction::Descending, Ordering::Greater) => true,
            _ => false,
        }
    }
}

/// Hoare-style quicksort around the middle element.
///
/// Both cursors scan inward past elements already on the correct side of the
/// pivot, swap the first out-of-place pair, and the two sub-ranges left after
/// the cursors cross are sorted recursively. The pivot slot always stops both
/// scans, so each pass shrinks both sides by at least one.
fn quicksort<T, K, F>(items: &mut [T], key: &F, dir: Direction)
where
    F: Fn(&T) -> K,
    K: Ord,
{
    if items.len() < 2 {
        return;
    }
    let high = items.len() - 1;
    let pivot = key(&items[high / 2]);
    let mut lo: isize = 0;
    let mut hi: isize = high as isize;

    while lo <= hi {
        while lo <= hi && dir.precedes(&key(&items[lo as usize]), &pivot) {
            lo += 1;
        }
        while lo <= hi && dir.precedes(&pivot, &key(&items[hi as usize])) {
            hi -= 1;
        }
        if lo <= hi {
            items.swap(lo as usize, hi as usize);
            lo += 1;
            hi -= 1;
        }
    }

    if hi > 0 {
        quicksort(&mut items[..=hi as usize], key, dir);
    }
    if (lo as usize) < high {
        quicksort(&mut items[lo as usize..], key, dir);
    }
}

/// Newest first.
pub fn sort_by_recency<T: Chronological>(items: &mut [T]) {
    quicksort(items, &|item: &T| item.timestamp(), Direction::Descending);
}

/// Ascending peer id; the precondition of [`intersect_by_id`].
pub fn sort_by_id(entries: &mut [TimelineEntry]) {
    quicksort(entries, &|entry: &TimelineEntry| entry.peer, Direction::Ascending);
}

/// Highest count first.
pub fn sort_by_count<T: Tallied>(items: &mut [T]) {
    quicksort(items, &|item: &T| item.tally(), Direction::Descending);
}

/// Merge-style intersection of two id-ascending slices.
///
/// When a peer appears on both sides the entry with the later timestamp is
/// kept; on equal timestamps the entry from `b` wins. Output is id-ascending.
pub fn intersect_by_id(a: &[TimelineEntry], b: &[TimelineEntry]) -> Vec<TimelineEntry> {
    debug_assert!(a.windows(2).all(|w| w[0].peer <= w[1].peer));
    debug_assert!(b.windows(2).all(|w| w[0].peer <= w[1].peer));

    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].peer.cmp(&b[j].peer) {
            Ordering::Equal => {
                let kept = if a[i].at > b[j].at { a[i] } else { b[j] };
                out.push(kept);
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

/// Strips timeline entries down to their peer ids.
pub fn peers(entries: &[TimelineEntry]) -> Vec<UserId> {
    entries.iter().map(|entry| entry.peer).collect()
}
