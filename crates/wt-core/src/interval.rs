//! Set algebra over half-open time intervals.
//!
//! A "set" here is any slice of intervals; it may overlap and is unordered.
//! Every operation that returns a set returns it normalized: sorted by start,
//! with overlapping or touching intervals merged into maximal runs.
//!
//! Degenerate intervals (`start == end`) are valid. They contribute nothing to
//! durations but survive union and difference unless another interval
//! absorbs or covers them.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Errors raised while building an interval.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// The event carried no value for a timestamp.
    #[error("missing {field} timestamp")]
    MissingTimestamp { field: &'static str },

    /// The timestamp could not be parsed.
    #[error("invalid {field} timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// The interval would run backwards.
    #[error("end {end} is before start {start}")]
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Creates an interval, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if end < start {
            return Err(IntervalError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds an interval from two bounds that are already known to be ordered
    /// (e.g. the pieces of a split).
    pub(crate) fn from_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.duration().num_milliseconds()
    }

    /// Duration in fractional hours.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hours(&self) -> f64 {
        self.duration_ms() as f64 / MS_PER_HOUR
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the instant lies inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Returns true if both intervals share a non-empty stretch of time.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// Removes `cut` from this interval, yielding zero, one, or two pieces.
    fn subtract(self, cut: &Self) -> Vec<Self> {
        if cut.is_empty() {
            return vec![self];
        }

        if self.is_empty() {
            return if cut.contains(self.start) {
                Vec::new()
            } else {
                vec![self]
            };
        }

        if !self.intersects(cut) {
            return vec![self];
        }

        let mut pieces = Vec::with_capacity(2);
        if self.start < cut.start {
            pieces.push(Self::from_ordered(self.start, cut.start));
        }
        if cut.end < self.end {
            pieces.push(Self::from_ordered(cut.end, self.end));
        }
        pieces
    }
}

/// Sorts and merges a set into maximal non-overlapping, non-touching runs.
#[must_use]
pub fn normalize(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}

/// Everything covered by either set.
#[must_use]
pub fn union(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let combined: Vec<Interval> = a.iter().chain(b).copied().collect();
    normalize(&combined)
}

/// The minuend with all subtrahend coverage removed.
///
/// Subtrahend intervals are applied one at a time, each fragmenting what is
/// left of the minuend; the order they are applied in does not change the
/// result.
#[must_use]
pub fn difference(minuend: &[Interval], subtrahend: &[Interval]) -> Vec<Interval> {
    let remaining = subtrahend.iter().fold(normalize(minuend), |acc, cut| {
        acc.into_iter()
            .flat_map(|piece| piece.subtract(cut))
            .collect()
    });
    normalize(&remaining)
}

/// Time covered by both sets.
#[must_use]
pub fn intersection(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let a = normalize(a);
    let b = normalize(b);

    let mut overlaps = Vec::new();
    for left in &a {
        for right in &b {
            let start = left.start.max(right.start);
            let end = left.end.min(right.end);
            if start < end {
                overlaps.push(Interval::from_ordered(start, end));
            }
        }
    }
    normalize(&overlaps)
}

/// Sum of every interval's duration, in fractional hours.
///
/// Overlaps are counted once per interval; normalize first for wall-clock time.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn total_hours(intervals: &[Interval]) -> f64 {
    let total_ms: i64 = intervals.iter().map(Interval::duration_ms).sum();
    total_ms as f64 / MS_PER_HOUR
}

/// Free blocks shorter than an hour are broken time and count as zero focus.
#[must_use]
pub fn filter_out_broken_time(hours: f64) -> f64 {
    if hours >= 1.0 { hours } else { 0.0 }
}

/// Hours spent in blocks of at least one hour.
#[must_use]
pub fn focus_hours(intervals: &[Interval]) -> f64 {
    intervals
        .iter()
        .map(|interval| filter_out_broken_time(interval.hours()))
        .fold(0.0, |acc, hours| acc + hours)
}
