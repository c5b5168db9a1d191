//! Aggregation states: how one raw line folds into a frequency map, and how
//! two partial maps merge. Implement `Aggregate` and run it through the
//! engine (or `TweetTop::aggregate_with`) to get a custom analysis.

use crate::emoji::emoji_glyphs;
use crate::error::RecordError;
use crate::record::{content, day_and_author, mentioned_usernames};
use ahash::AHashMap;
use time::Date;

/// One analysis's aggregation state. `merge` must be commutative and
/// associative over states built by `ingest`, so partial results from
/// concurrently processed chunks can be combined in completion order.
pub trait Aggregate: Default + Send {
    /// Chunk size used when the caller does not set one.
    const DEFAULT_LINES_PER_CHUNK: usize = 10_000;

    /// Fold one raw JSONL line into this state.
    fn ingest(&mut self, line: &str) -> Result<(), RecordError>;

    /// Absorb another state built from disjoint lines.
    fn merge(&mut self, other: Self);
}

/// Point-wise sum over the union of keys; absent keys mean zero.
pub(crate) fn merge_flat(total: &mut AHashMap<String, u64>, part: AHashMap<String, u64>) {
    for (k, n) in part {
        *total.entry(k).or_insert(0) += n;
    }
}

/// Nested per-day counter: day → (username → tweet count).
#[derive(Default)]
pub struct DailyAuthorCounts {
    pub counts: AHashMap<Date, AHashMap<String, u64>>,
}

impl Aggregate for DailyAuthorCounts {
    const DEFAULT_LINES_PER_CHUNK: usize = 1_000;

    fn ingest(&mut self, line: &str) -> Result<(), RecordError> {
        let (day, username) = day_and_author(line)?;
        *self.counts.entry(day).or_default().entry(username).or_insert(0) += 1;
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        for (day, users) in other.counts {
            merge_flat(self.counts.entry(day).or_default(), users);
        }
    }
}

/// Flat counter of emoji glyphs across tweet bodies.
#[derive(Default)]
pub struct EmojiCounts {
    pub counts: AHashMap<String, u64>,
}

impl Aggregate for EmojiCounts {
    fn ingest(&mut self, line: &str) -> Result<(), RecordError> {
        let body = content(line)?;
        for glyph in emoji_glyphs(&body) {
            *self.counts.entry(glyph.to_string()).or_insert(0) += 1;
        }
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        merge_flat(&mut self.counts, other.counts);
    }
}

/// Flat counter of mentioned usernames.
#[derive(Default)]
pub struct MentionCounts {
    pub counts: AHashMap<String, u64>,
}

impl Aggregate for MentionCounts {
    fn ingest(&mut self, line: &str) -> Result<(), RecordError> {
        for username in mentioned_usernames(line)? {
            *self.counts.entry(username).or_insert(0) += 1;
        }
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        merge_flat(&mut self.counts, other.counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn mention_state(lines: &[&str]) -> MentionCounts {
        let mut s = MentionCounts::default();
        for l in lines {
            s.ingest(l).unwrap();
        }
        s
    }

    #[test]
    fn merging_an_empty_state_is_a_noop() {
        let mut a = mention_state(&[r#"{"mentionedUsers":[{"username":"x"},{"username":"y"}]}"#]);
        a.merge(MentionCounts::default());
        assert_eq!(a.counts.get("x"), Some(&1));
        assert_eq!(a.counts.get("y"), Some(&1));
        assert_eq!(a.counts.len(), 2);
    }

    #[test]
    fn merge_order_is_irrelevant() {
        let l1 = r#"{"mentionedUsers":[{"username":"x"}]}"#;
        let l2 = r#"{"mentionedUsers":[{"username":"x"},{"username":"y"}]}"#;

        let mut ab = mention_state(&[l1]);
        ab.merge(mention_state(&[l2]));
        let mut ba = mention_state(&[l2]);
        ba.merge(mention_state(&[l1]));

        assert_eq!(ab.counts, ba.counts);
        assert_eq!(ab.counts.get("x"), Some(&2));
    }

    #[test]
    fn daily_merge_sums_inner_counts() {
        let line = r#"{"date":"2021-02-01T10:00:00+00:00","user":{"username":"alice"}}"#;
        let mut a = DailyAuthorCounts::default();
        a.ingest(line).unwrap();
        let mut b = DailyAuthorCounts::default();
        b.ingest(line).unwrap();
        b.ingest(line).unwrap();

        a.merge(b);
        assert_eq!(a.counts[&date!(2021 - 02 - 01)]["alice"], 3);
    }
}
