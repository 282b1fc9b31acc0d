use serde::Serialize;

use crate::error::{Result, WitterError};

use super::list::{self, LinkedStack};

/// Bucket count used for the relationship index.
pub const DEFAULT_RELATION_BUCKETS: usize = 151;
/// Bucket count used for the per-author content index.
pub const DEFAULT_CONTENT_BUCKETS: usize = 10_007;

struct Slot<V> {
    key: i64,
    value: V,
}

/// Hash index over integer keys with a fixed number of buckets and separate
/// chaining.
///
/// The bucket of a key is `|key| mod bucket_count`. New entries are pushed at
/// the head of their chain, so chain order is reverse insertion order. The
/// index never resizes: once the number of keys grows well past the bucket
/// count, chains lengthen and lookups degrade towards O(k) in the chain length.
pub struct ChainedHashIndex<V> {
    buckets: Box<[LinkedStack<Slot<V>>]>,
    len: usize,
}

/// Occupancy summary for a [`ChainedHashIndex`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ChainStats {
    /// Number of buckets the index was built with.
    pub buckets: usize,
    /// Buckets holding at least one entry.
    pub occupied: usize,
    /// Length of the longest chain.
    pub longest_chain: usize,
    /// Total number of entries.
    pub entries: usize,
}

impl<V> ChainedHashIndex<V> {
    /// Builds an empty index with `bucket_count` buckets.
    pub fn with_buckets(bucket_count: usize) -> Result<Self> {
        if bucket_count == 0 {
            return Err(WitterError::InvalidArgument(
                "hash index needs at least one bucket".into(),
            ));
        }
        let buckets = (0..bucket_count)
            .map(|_| LinkedStack::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self { buckets, len: 0 })
    }

    /// Number of buckets fixed at construction.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no key has been inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_of(&self, key: i64) -> usize {
        (key.unsigned_abs() % self.buckets.len() as u64) as usize
    }

    /// Inserts `make()` under `key` unless the key is already present.
    ///
    /// Returns `true` when a new entry was created. `make` is not called for an
    /// existing key.
    pub fn insert_if_absent<F>(&mut self, key: i64, make: F) -> bool
    where
        F: FnOnce() -> V,
    {
        if self.contains(key) {
            return false;
        }
        let idx = self.bucket_of(key);
        self.buckets[idx].push_front(Slot { key, value: make() });
        self.len += 1;
        true
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: i64) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| &slot.value)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        let idx = self.bucket_of(key);
        self.buckets[idx]
            .iter_mut()
            .find(|slot| slot.key == key)
            .map(|slot| &mut slot.value)
    }

    /// Returns `true` when `key` has an entry.
    pub fn contains(&self, key: i64) -> bool {
        self.buckets[self.bucket_of(key)]
            .iter()
            .any(|slot| slot.key == key)
    }

    /// Visits every entry once: buckets in index order, each chain head first.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
        }
    }

    /// Summarises bucket occupancy and chain lengths.
    pub fn stats(&self) -> ChainStats {
        let mut stats = ChainStats {
            buckets: self.buckets.len(),
            entries: self.len,
            ..ChainStats::default()
        };
        for bucket in self.buckets.iter() {
            if !bucket.is_empty() {
                stats.occupied += 1;
                stats.longest_chain = stats.longest_chain.max(bucket.len());
            }
        }
        stats
    }
}

/// Iterator over `(key, &value)` pairs of a [`ChainedHashIndex`].
pub struct Iter<'a, V> {
    buckets: std::slice::Iter<'a, LinkedStack<Slot<V>>>,
    chain: Option<list::Iter<'a, Slot<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(chain) = self.chain.as_mut() {
                if let Some(slot) = chain.next() {
                    return Some((slot.key, &slot.value));
                }
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_buckets_rejected() {
        let err = ChainedHashIndex::<u8>::with_buckets(0)
            .err()
            .expect("zero buckets must fail");
        assert!(matches!(err, WitterError::InvalidArgument(_)));
    }

    #[test]
    fn insert_if_absent_keeps_first_value() {
        let mut index = ChainedHashIndex::with_buckets(7).expect("index");
        assert!(index.insert_if_absent(3, || "first"));
        assert!(!index.insert_if_absent(3, || "second"));
        assert_eq!(index.get(3), Some(&"first"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn colliding_keys_share_a_chain() {
        let mut index = ChainedHashIndex::with_buckets(151).expect("index");
        for key in [5, 156, 307, -5] {
            assert!(index.insert_if_absent(key, || key * 10));
        }
        for key in [5, 156, 307, -5] {
            assert!(index.contains(key));
            assert_eq!(index.get(key), Some(&(key * 10)));
        }
        assert!(!index.contains(458));
        let stats = index.stats();
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.longest_chain, 4);
        assert_eq!(stats.entries, 4);
    }

    #[test]
    fn get_mut_updates_value() {
        let mut index = ChainedHashIndex::with_buckets(3).expect("index");
        index.insert_if_absent(1, Vec::new);
        index.insert_if_absent(4, Vec::new);
        index.get_mut(4).expect("key 4").push(99);
        assert_eq!(index.get(4), Some(&vec![99]));
        assert_eq!(index.get(1), Some(&Vec::new()));
        assert!(index.get_mut(7).is_none());
    }

    #[test]
    fn iter_visits_every_entry_once() {
        let mut index = ChainedHashIndex::with_buckets(5).expect("index");
        for key in 0..40 {
            index.insert_if_absent(key, || key);
        }
        let mut seen: Vec<i64> = index.iter().map(|(key, value)| {
            assert_eq!(key, *value);
            key
        }).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn extreme_keys_hash_without_overflow() {
        let mut index = ChainedHashIndex::with_buckets(151).expect("index");
        assert!(index.insert_if_absent(i64::MIN, || 1));
        assert!(index.insert_if_absent(i64::MAX, || 2));
        assert_eq!(index.get(i64::MIN), Some(&1));
        assert_eq!(index.get(i64::MAX), Some(&2));
    }
}
