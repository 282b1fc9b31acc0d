use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::model::TagCount;
use crate::primitives::sort::sort_by_count;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[a-z0-9_-]+").expect("tag pattern compiles"));

/// Extracts hashtag tokens from `message`, lower-cased, in order of
/// appearance. Repeated tags are returned once per occurrence.
pub fn extract_tags(message: &str) -> Vec<String> {
    let lowered = message.to_lowercase();
    TAG_PATTERN
        .find_iter(&lowered)
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Global occurrence counts for every tag seen by a content store.
#[derive(Debug, Default)]
pub struct TagTable {
    counts: Vec<TagCount>,
    positions: FxHashMap<String, usize>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `tag`. Returns `true` if the tag is new.
    pub fn record(&mut self, tag: &str) -> bool {
        if let Some(&pos) = self.positions.get(tag) {
            self.counts[pos].count += 1;
            return false;
        }
        self.positions.insert(tag.to_string(), self.counts.len());
        self.counts.push(TagCount {
            tag: tag.to_string(),
            count: 1,
        });
        true
    }

    pub fn count(&self, tag: &str) -> usize {
        self.positions
            .get(tag)
            .map_or(0, |&pos| self.counts[pos].count)
    }

    /// Distinct tags recorded.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `limit` most frequent tags with their counts, highest first.
    pub fn top(&self, limit: usize) -> Vec<TagCount> {
        let mut ranked = self.counts.clone();
        sort_by_count(&mut ranked);
        ranked.truncate(limit);
        ranked
    }
}
