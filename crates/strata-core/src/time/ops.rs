//! Operations over sequences of periods.
//!
//! The inputs are expected to be sorted and non-overlapping; these helpers
//! do not re-sort.

use super::Period;

/// Merge abutting periods.
///
/// A succession of daily periods `[may 1, may 2) [may 2, may 3)` fuses into
/// `[may 1, may 3)`.
pub fn fuse_successive(periods: &[Period]) -> Vec<Period> {
    let mut reduced: Vec<Period> = periods.first().copied().into_iter().collect();
    for period in periods.iter().skip(1) {
        let last = reduced.last_mut().expect("seeded with first element");
        if last.stop == period.start {
            *last = Period {
                start: last.start,
                stop: period.stop,
                include_start: last.include_start,
                include_stop: period.include_stop,
            };
        } else {
            reduced.push(*period);
        }
    }
    reduced
}

/// Envelope of all periods, or `None` for an empty sequence.
pub fn envelop(periods: &[Period]) -> Option<Period> {
    periods
        .iter()
        .copied()
        .reduce(|acc, period| acc.union(&period))
}

/// Gaps between successive periods.
///
/// Each hole inverts the inclusivity of the bounds it borrows, so the holes
/// are the exact complement within the envelope:
/// `[may 1, may 2) [may 3, may 4]` -> `[may 2, may 3)`.
pub fn holes(periods: &[Period]) -> Vec<Period> {
    periods
        .windows(2)
        .map(|pair| Period {
            start: pair[0].stop,
            stop: pair[1].start,
            include_start: !pair[0].include_stop,
            include_stop: !pair[1].include_start,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_fuse_successive_dailies() {
        let periods = vec![
            Period::half_open(day(1), day(2)),
            Period::half_open(day(2), day(3)),
            Period::half_open(day(5), day(6)),
        ];
        let fused = fuse_successive(&periods);
        assert_eq!(
            fused,
            vec![
                Period::half_open(day(1), day(3)),
                Period::half_open(day(5), day(6)),
            ]
        );
    }

    #[test]
    fn test_fuse_empty() {
        assert!(fuse_successive(&[]).is_empty());
    }

    #[test]
    fn test_envelop() {
        let periods = vec![
            Period::half_open(day(1), day(2)),
            Period::new(day(5), day(7)),
        ];
        assert_eq!(envelop(&periods), Some(Period::new(day(1), day(7))));
        assert_eq!(envelop(&[]), None);
    }

    #[test]
    fn test_holes_invert_inclusivity() {
        let periods = vec![
            Period::half_open(day(1), day(2)),
            Period::new(day(3), day(4)),
            Period::new(day(5), day(7)),
        ];
        let gaps = holes(&periods);
        assert_eq!(gaps.len(), 2);
        // [may 1, may 2) leaves the gap start inclusive.
        assert_eq!(gaps[0].start, day(2));
        assert_eq!(gaps[0].stop, day(3));
        assert!(gaps[0].include_start);
        assert!(!gaps[0].include_stop);
        // [may 3, may 4] leaves the gap start exclusive.
        assert_eq!(gaps[1].start, day(4));
        assert!(!gaps[1].include_start);
    }
}
