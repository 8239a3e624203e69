//! Datetime interval with independently inclusive or exclusive bounds.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A datetime interval.
///
/// Both bounds carry their own inclusivity flag, so `[a, b)`, `(a, b]`,
/// `[a, b]` and `(a, b)` are all representable, as is the degenerate
/// single-point interval `[a, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    /// Start of the interval.
    pub start: NaiveDateTime,
    /// End of the interval.
    pub stop: NaiveDateTime,
    /// Inclusive (true) or strict (false) start bound.
    pub include_start: bool,
    /// Inclusive (true) or strict (false) stop bound.
    pub include_stop: bool,
}

impl Period {
    /// Closed interval `[start, stop]`.
    pub fn new(start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        Self {
            start,
            stop,
            include_start: true,
            include_stop: true,
        }
    }

    /// Half-open interval `[start, stop)`.
    pub fn half_open(start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        Self {
            start,
            stop,
            include_start: true,
            include_stop: false,
        }
    }

    /// Midpoint of the interval.
    pub fn center(&self) -> NaiveDateTime {
        self.start + (self.stop - self.start) / 2
    }

    /// Point membership honoring the bound inclusivity flags.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.contains_at(time, true)
    }

    /// Point membership. With `include_bounds` set to false both ends are
    /// treated as strict regardless of the interval's own flags.
    pub fn contains_at(&self, time: NaiveDateTime, include_bounds: bool) -> bool {
        let lower = if self.include_start && include_bounds {
            self.start <= time
        } else {
            self.start < time
        };
        let upper = if self.include_stop && include_bounds {
            time <= self.stop
        } else {
            time < self.stop
        };
        lower && upper
    }

    /// True if the two intervals share at least one point.
    ///
    /// Symmetric by construction: `a.intersects(b) == b.intersects(a)`.
    pub fn intersects(&self, other: &Period) -> bool {
        self.intersection(other).is_some()
    }

    /// Overlap of two intervals, or `None` when they do not meet.
    ///
    /// A degenerate single-point overlap survives only when both touching
    /// bounds are inclusive.
    pub fn intersection(&self, other: &Period) -> Option<Period> {
        let (start, include_start) = match self.start.cmp(&other.start) {
            std::cmp::Ordering::Less => (other.start, other.include_start),
            std::cmp::Ordering::Greater => (self.start, self.include_start),
            std::cmp::Ordering::Equal => {
                (self.start, self.include_start && other.include_start)
            }
        };
        let (stop, include_stop) = match self.stop.cmp(&other.stop) {
            std::cmp::Ordering::Less => (self.stop, self.include_stop),
            std::cmp::Ordering::Greater => (other.stop, other.include_stop),
            std::cmp::Ordering::Equal => (self.stop, self.include_stop && other.include_stop),
        };

        if stop < start || (stop == start && !(include_start && include_stop)) {
            return None;
        }

        Some(Period {
            start,
            stop,
            include_start,
            include_stop,
        })
    }

    /// Envelope of both intervals.
    pub fn union(&self, other: &Period) -> Period {
        let (start, include_start) = match self.start.cmp(&other.start) {
            std::cmp::Ordering::Less => (self.start, self.include_start),
            std::cmp::Ordering::Greater => (other.start, other.include_start),
            std::cmp::Ordering::Equal => (self.start, self.include_start || other.include_start),
        };
        let (stop, include_stop) = match self.stop.cmp(&other.stop) {
            std::cmp::Ordering::Less => (other.stop, other.include_stop),
            std::cmp::Ordering::Greater => (self.stop, self.include_stop),
            std::cmp::Ordering::Equal => (self.stop, self.include_stop || other.include_stop),
        };
        Period {
            start,
            stop,
            include_start,
            include_stop,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.include_start { '[' } else { ']' },
            self.start,
            self.stop,
            if self.include_stop { ']' } else { '[' },
        )
    }
}
