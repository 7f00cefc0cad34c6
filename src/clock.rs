//! Wall clock rendered in the service's display timezone

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Timezone every page is rendered in
pub const DISPLAY_TIMEZONE: Tz = chrono_tz::Europe::Moscow;

/// `YYYY-MM-DD HH:MM:SS`
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an instant in the display timezone
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&DISPLAY_TIMEZONE)
        .format(DISPLAY_FORMAT)
        .to_string()
}

/// Current time in the display timezone
pub fn now_formatted() -> String {
    format_instant(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn has_display_shape(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 19
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                10 => *b == b' ',
                13 | 16 => *b == b':',
                _ => b.is_ascii_digit(),
            })
    }

    #[test]
    fn test_moscow_is_three_hours_ahead_of_utc() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(format_instant(instant), "2024-01-15 12:30:00");
    }

    #[test]
    fn test_no_daylight_saving_shift_in_summer() {
        let instant = Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap();
        assert_eq!(format_instant(instant), "2024-07-01 12:30:00");
    }

    #[test]
    fn test_rolls_over_midnight() {
        let instant = Utc.with_ymd_and_hms(2023, 12, 31, 22, 15, 5).unwrap();
        assert_eq!(format_instant(instant), "2024-01-01 01:15:05");
    }

    #[test]
    fn test_now_has_display_shape() {
        assert!(has_display_shape(&now_formatted()));
    }

    proptest! {
        #[test]
        fn prop_any_instant_has_display_shape(secs in 0i64..4_102_444_800) {
            let instant = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            prop_assert!(has_display_shape(&format_instant(instant)));
        }
    }
}
