//! Interval union and subtraction over wall-clock time.
//!
//! Concurrently worked tasks on the same panel produce overlapping intervals; the
//! panel's elapsed time is the length of their union, never the sum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::time::minutes_between;

/// A closed wall-clock interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Zero-length and inverted intervals cover no time.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Length in minutes; zero for empty or inverted intervals.
    pub fn length_minutes(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            minutes_between(self.start, self.end)
        }
    }
}

/// Merge intervals into a sorted list of disjoint intervals.
///
/// Intervals that touch at an endpoint are merged. Empty and inverted
/// intervals are dropped.
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.iter().copied().filter(|i| !i.is_empty()).collect();
    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(open) if interval.start <= open.end => {
                if interval.end > open.end {
                    open.end = interval.end;
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Total length in minutes of the union of `intervals`.
pub fn union_length_minutes(intervals: &[Interval]) -> f64 {
    merge_intervals(intervals)
        .iter()
        .map(Interval::length_minutes)
        .sum()
}

/// Parts of `interval` not covered by any of `exclusions`, in order.
pub fn subtract_intervals(interval: Interval, exclusions: &[Interval]) -> Vec<Interval> {
    if interval.is_empty() {
        return vec![];
    }

    let mut remaining = Vec::new();
    let mut cursor = interval.start;

    for exclusion in merge_intervals(exclusions) {
        if exclusion.end <= cursor {
            continue;
        }
        if exclusion.start >= interval.end {
            break;
        }
        if exclusion.start > cursor {
            remaining.push(Interval::new(cursor, exclusion.start));
        }
        cursor = cursor.max(exclusion.end);
        if cursor >= interval.end {
            break;
        }
    }

    if cursor < interval.end {
        remaining.push(Interval::new(cursor, interval.end));
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minute)
    }

    fn iv(start: i64, end: i64) -> Interval {
        Interval::new(at(start), at(end))
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(union_length_minutes(&[]), 0.0);
    }

    #[test]
    fn test_single_interval() {
        assert_eq!(union_length_minutes(&[iv(3, 13)]), 10.0);
    }

    #[test]
    fn test_overlap_not_double_counted() {
        // Two 10-minute tasks overlapping by 5 minutes.
        assert_eq!(union_length_minutes(&[iv(0, 10), iv(5, 15)]), 15.0);
    }

    #[test]
    fn test_disjoint_intervals_sum() {
        assert_eq!(union_length_minutes(&[iv(0, 10), iv(20, 25)]), 15.0);
    }

    #[test]
    fn test_touching_intervals_merge() {
        let merged = merge_intervals(&[iv(10, 20), iv(0, 10)]);
        assert_eq!(merged, vec![iv(0, 20)]);
    }

    #[test]
    fn test_contained_interval() {
        assert_eq!(union_length_minutes(&[iv(0, 30), iv(5, 10)]), 30.0);
    }

    #[test]
    fn test_zero_length_and_inverted_contribute_nothing() {
        assert_eq!(union_length_minutes(&[iv(5, 5), iv(10, 2)]), 0.0);
        assert_eq!(union_length_minutes(&[iv(0, 4), iv(9, 1)]), 4.0);
        assert_eq!(iv(10, 2).length_minutes(), 0.0);
    }

    #[test]
    fn test_subtract_middle() {
        let parts = subtract_intervals(iv(0, 30), &[iv(10, 15)]);
        assert_eq!(parts, vec![iv(0, 10), iv(15, 30)]);
    }

    #[test]
    fn test_subtract_edges_and_outside() {
        let parts = subtract_intervals(iv(10, 30), &[iv(0, 12), iv(28, 40), iv(50, 60)]);
        assert_eq!(parts, vec![iv(12, 28)]);
    }

    #[test]
    fn test_subtract_overlapping_exclusions() {
        let parts = subtract_intervals(iv(0, 30), &[iv(5, 12), iv(10, 20)]);
        assert_eq!(parts, vec![iv(0, 5), iv(20, 30)]);
    }

    #[test]
    fn test_subtract_everything() {
        assert!(subtract_intervals(iv(5, 10), &[iv(0, 20)]).is_empty());
        assert!(subtract_intervals(iv(10, 5), &[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_union_is_order_invariant(
            raw in prop::collection::vec((0i64..500, 0i64..120), 0..12),
            rotate in 0usize..12,
        ) {
            let intervals: Vec<Interval> = raw.iter().map(|(s, len)| iv(*s, s + len)).collect();
            let mut reordered = intervals.clone();
            reordered.reverse();
            if !reordered.is_empty() {
                let k = rotate % reordered.len();
                reordered.rotate_left(k);
            }
            prop_assert_eq!(union_length_minutes(&intervals), union_length_minutes(&reordered));
        }

        #[test]
        fn prop_two_intervals_inclusion_exclusion(
            a_start in 0i64..200, a_len in 1i64..100,
            b_start in 0i64..200, b_len in 1i64..100,
        ) {
            let a = iv(a_start, a_start + a_len);
            let b = iv(b_start, b_start + b_len);
            let overlap = (a_start + a_len).min(b_start + b_len) - a_start.max(b_start);
            let overlap = overlap.max(0) as f64;
            let expected = a.length_minutes() + b.length_minutes() - overlap;
            prop_assert_eq!(union_length_minutes(&[a, b]), expected);
        }

        #[test]
        fn prop_union_never_exceeds_sum(
            raw in prop::collection::vec((0i64..500, 0i64..120), 0..12),
        ) {
            let intervals: Vec<Interval> = raw.iter().map(|(s, len)| iv(*s, s + len)).collect();
            let sum: f64 = intervals.iter().map(Interval::length_minutes).sum();
            prop_assert!(union_length_minutes(&intervals) <= sum);
        }
    }
}
