use crate::model::{TimelineEntry, Timestamp, UserId};

use super::list::LinkedStack;

/// Relationship list of one user: `(peer, timestamp)` pairs in head-insertion
/// order.
///
/// The export order is most-recent-insertion first, which only matches
/// timestamp order when edges were inserted chronologically. Callers sort.
#[derive(Debug, Default)]
pub struct IdTimeline {
    entries: LinkedStack<TimelineEntry>,
}

impl IdTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_front(&mut self, peer: UserId, at: Timestamp) {
        self.entries.push_front(TimelineEntry::new(peer, at));
    }

    /// Linear scan for `peer`.
    pub fn contains(&self, peer: UserId) -> bool {
        self.entries.iter().any(|entry| entry.peer == peer)
    }

    pub fn get(&self, peer: UserId) -> Option<&TimelineEntry> {
        self.entries.iter().find(|entry| entry.peer == peer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineEntry> + '_ {
        self.entries.iter()
    }

    /// Snapshot of the list in head-insertion order.
    pub fn to_vec(&self) -> Vec<TimelineEntry> {
        self.entries.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn export_keeps_insertion_order_not_time_order() {
        let mut timeline = IdTimeline::new();
        timeline.push_front(7, datetime!(2020-03-01 0:00 UTC));
        timeline.push_front(8, datetime!(2020-01-01 0:00 UTC));
        timeline.push_front(9, datetime!(2020-02-01 0:00 UTC));

        let peers: Vec<UserId> = timeline.to_vec().iter().map(|e| e.peer).collect();
        assert_eq!(peers, vec![9, 8, 7]);
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn contains_and_get_scan_the_list() {
        let mut timeline = IdTimeline::new();
        assert!(!timeline.contains(1));
        assert!(timeline.is_empty());
        let at = datetime!(2021-06-15 12:30 UTC);
        timeline.push_front(1, at);
        assert!(timeline.contains(1));
        assert_eq!(timeline.get(1).map(|e| e.at), Some(at));
        assert!(timeline.get(2).is_none());
    }
}
