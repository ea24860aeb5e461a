//! Time-interval arithmetic on half-open `[start, end)` windows.
//!
//! All comparisons happen on minutes-since-midnight integers, never on
//! formatted time strings. Callers reject malformed windows (`end <= start`)
//! before reaching these primitives.

use crate::models::time::ClockTime;

/// Whether two half-open intervals `[a_start, a_end)` and `[b_start, b_end)`
/// overlap.
///
/// Boundaries are exact: an event ending at 11:30 and one starting at 11:30
/// do not overlap.
pub fn overlaps(a_start: ClockTime, a_end: ClockTime, b_start: ClockTime, b_end: ClockTime) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}

/// Whether `[inner_start, inner_end)` lies entirely within
/// `[outer_start, outer_end)`.
pub fn contains(
    outer_start: ClockTime,
    outer_end: ClockTime,
    inner_start: ClockTime,
    inner_end: ClockTime,
) -> bool {
    outer_start <= inner_start && inner_end <= outer_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u16, minute: u16) -> ClockTime {
        ClockTime::from_hm(hour, minute).unwrap()
    }

    #[test]
    fn test_identical_intervals_overlap() {
        assert!(overlaps(t(9, 30), t(11, 30), t(9, 30), t(11, 30)));
    }

    #[test]
    fn test_touching_boundaries_do_not_overlap() {
        // Ending at 11:30 and starting at 11:30 share only the boundary.
        assert!(!overlaps(t(9, 30), t(11, 30), t(11, 30), t(12, 0)));
        assert!(!overlaps(t(9, 30), t(11, 30), t(8, 0), t(9, 30)));
    }

    #[test]
    fn test_one_minute_overlap_at_end() {
        assert!(overlaps(t(9, 30), t(11, 30), t(11, 29), t(12, 0)));
    }

    #[test]
    fn test_one_minute_extension_overlaps() {
        // Shifting the end from 11:30 to 11:31 turns a touching pair into an
        // overlapping one.
        assert!(overlaps(t(9, 30), t(11, 31), t(9, 30), t(11, 30)));
    }

    #[test]
    fn test_containment_overlaps() {
        assert!(overlaps(t(9, 0), t(12, 0), t(10, 0), t(11, 0)));
        assert!(overlaps(t(10, 0), t(11, 0), t(9, 0), t(12, 0)));
    }

    #[test]
    fn test_disjoint_intervals() {
        assert!(!overlaps(t(8, 0), t(9, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn test_symmetry() {
        let cases = [
            (t(9, 30), t(11, 30), t(11, 0), t(12, 0)),
            (t(9, 30), t(11, 30), t(11, 30), t(12, 0)),
            (t(8, 0), t(9, 0), t(10, 0), t(11, 0)),
            (t(9, 0), t(12, 0), t(10, 0), t(11, 0)),
        ];
        for (a1, a2, b1, b2) in cases {
            assert_eq!(
                overlaps(a1, a2, b1, b2),
                overlaps(b1, b2, a1, a2),
                "overlap must be symmetric for [{a1},{a2}) vs [{b1},{b2})"
            );
        }
    }

    #[test]
    fn test_contains() {
        assert!(contains(t(8, 0), t(16, 0), t(9, 0), t(10, 0)));
        assert!(contains(t(8, 0), t(16, 0), t(8, 0), t(16, 0)));
        assert!(!contains(t(8, 0), t(16, 0), t(15, 30), t(16, 1)));
    }
}
