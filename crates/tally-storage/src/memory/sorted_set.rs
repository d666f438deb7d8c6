//! Sorted set: score lookup by member plus an ordered index for rank queries.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use tally_core::traits::resolve_rank_range;
use tally_core::RangeOrder;

/// `f64` with a total order so it can sit in a `BTreeSet`.
#[derive(Debug, Clone, Copy)]
struct Score(f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SortedSet {
    scores: HashMap<String, f64>,
    ordered: BTreeSet<(Score, String)>,
}

impl SortedSet {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).copied()
    }

    /// Returns true when `member` is new.
    pub fn insert(&mut self, member: &str, score: f64) -> bool {
        let previous = self.scores.insert(member.to_string(), score);
        if let Some(old) = previous {
            self.ordered.remove(&(Score(old), member.to_string()));
        }
        self.ordered.insert((Score(score), member.to_string()));
        previous.is_none()
    }

    pub fn range(&self, start: i64, stop: i64, order: RangeOrder) -> Vec<String> {
        let Some((start, stop)) = resolve_rank_range(self.len(), start, stop) else {
            return Vec::new();
        };
        let take = stop - start + 1;
        let members = self.ordered.iter().map(|(_, m)| m.clone());
        match order {
            RangeOrder::Ascending => members.skip(start).take(take).collect(),
            RangeOrder::Descending => members.rev().skip(start).take(take).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(m, s)| (m.as_str(), *s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_moves_member() {
        let mut z = SortedSet::default();
        assert!(z.insert("a", 1.0));
        assert!(z.insert("b", 2.0));
        assert!(!z.insert("a", 3.0));
        assert_eq!(z.len(), 2);
        assert_eq!(z.range(0, -1, RangeOrder::Descending), vec!["a", "b"]);
    }

    #[test]
    fn ties_order_by_member() {
        let mut z = SortedSet::default();
        z.insert("b", 1.0);
        z.insert("a", 1.0);
        z.insert("c", 1.0);
        assert_eq!(z.range(0, -1, RangeOrder::Ascending), vec!["a", "b", "c"]);
        assert_eq!(z.range(0, -1, RangeOrder::Descending), vec!["c", "b", "a"]);
    }
}
