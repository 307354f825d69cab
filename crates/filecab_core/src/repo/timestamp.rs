//! Sortable timestamp identifiers for range-queried repositories.
//!
//! # Responsibility
//! - Render UTC instants in the fixed-width filename format whose
//!   lexicographic order equals chronological order.
//! - Clamp range bounds below the supported floor.
//!
//! # Invariants
//! - `sortable_timestamp` output is zero-padded and millisecond-precise:
//!   `YYYY-MM-DDTHHMMSS.mmmZ`.
//! - Instants before 2000-01-01T00:00:00Z are treated as uninitialized
//!   and clamp to that floor.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

const FLOOR_YEAR: i32 = 2000;

/// Earliest instant a range bound may take after clamping.
pub static RANGE_FLOOR: Lazy<DateTime<Utc>> = Lazy::new(|| {
    Utc.with_ymd_and_hms(FLOOR_YEAR, 1, 1, 0, 0, 0)
        .single()
        .expect("2000-01-01T00:00:00Z is a valid UTC instant")
});

static SORTABLE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{6}\.\d{3}Z$").expect("sortable timestamp regex is valid")
});

/// Renders `at` as a sortable record identifier.
pub fn sortable_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H%M%S%.3fZ").to_string()
}

/// Replaces instants before the floor with the floor itself.
///
/// Guards against zero-value dates being read as "no lower bound"; applied
/// independently to both ends of a range query.
pub fn clamp_to_floor(at: DateTime<Utc>) -> DateTime<Utc> {
    if at.year() < FLOOR_YEAR {
        *RANGE_FLOOR
    } else {
        at
    }
}

/// Returns whether `value` has the sortable timestamp identifier shape.
///
/// Range scans are chronologically meaningful only over repositories whose
/// record ids satisfy this predicate; callers managing their own ids can
/// use it to audit an id scheme.
pub fn is_sortable_timestamp(value: &str) -> bool {
    SORTABLE_SHAPE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{clamp_to_floor, is_sortable_timestamp, sortable_timestamp, RANGE_FLOOR};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn format_is_fixed_width_and_zero_padded() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 4, 2, 3).unwrap() + Duration::milliseconds(7);
        assert_eq!(sortable_timestamp(at), "2024-03-05T040203.007Z");
    }

    #[test]
    fn lexicographic_order_matches_chronological_order() {
        let earlier = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let much_later = later + Duration::milliseconds(1);

        assert!(sortable_timestamp(earlier) < sortable_timestamp(later));
        assert!(sortable_timestamp(later) < sortable_timestamp(much_later));
    }

    #[test]
    fn instants_before_floor_clamp_to_floor() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(clamp_to_floor(epoch), *RANGE_FLOOR);

        let after_floor = Utc.with_ymd_and_hms(2001, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(clamp_to_floor(after_floor), after_floor);
    }

    #[test]
    fn shape_predicate_accepts_generated_ids_only() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 25, 3).unwrap();
        assert!(is_sortable_timestamp(&sortable_timestamp(at)));

        assert!(!is_sortable_timestamp("t-1"));
        assert!(!is_sortable_timestamp("2024-03-05"));
        assert!(!is_sortable_timestamp("2024-03-05T142503.123Z.json"));
    }
}
