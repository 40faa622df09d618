use crate::error::app_error::AppError;
use chrono::NaiveTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub duration: f64,
    pub price: f64,
}

/// Parse a wall-clock time from the booking form ("HH:MM", seconds optional).
pub fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| AppError::BadRequest(format!("Invalid time of day: {value}")))
}

/// Fractional hours between start and end of a same-day time range.
///
/// A non-positive raw difference is clamped to one hour instead of being
/// rejected; the booking form occasionally submits degenerate ranges and
/// the policy is to tolerate them, not fail the order.
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let minutes = end.signed_duration_since(start).num_minutes();
    let raw = minutes as f64 / 60.0;
    if raw <= 0.0 { 1.0 } else { raw }
}

/// Price estimate for a time range at the provider's hourly rate. The
/// result is frozen onto the booking at creation and never recomputed.
pub fn quote(hourly_rate: f64, start: NaiveTime, end: NaiveTime) -> Quote {
    let duration = duration_hours(start, end);
    Quote {
        duration,
        price: hourly_rate * duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn whole_hours() {
        let quote = quote(25.0, t(9, 0), t(12, 0));
        assert_eq!(quote.duration, 3.0);
        assert_eq!(quote.price, 75.0);
    }

    #[test]
    fn fractional_minutes() {
        let quote = quote(40.0, t(10, 0), t(11, 30));
        assert_eq!(quote.duration, 1.5);
        assert_eq!(quote.price, 60.0);
    }

    #[test]
    fn degenerate_range_clamps_to_one_hour() {
        assert_eq!(duration_hours(t(14, 0), t(14, 0)), 1.0);
        assert_eq!(duration_hours(t(16, 0), t(9, 0)), 1.0);
        let quote = quote(30.0, t(16, 0), t(9, 0));
        assert_eq!(quote.price, 30.0);
    }

    #[test]
    fn parses_form_times() {
        assert_eq!(parse_time("09:00").unwrap(), t(9, 0));
        assert_eq!(parse_time(" 14:30 ").unwrap(), t(14, 30));
        assert_eq!(parse_time("14:30:00").unwrap(), t(14, 30));
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noonish").is_err());
    }

    proptest! {
        #[test]
        fn duration_is_always_positive(sh in 0u32..24, sm in 0u32..60, eh in 0u32..24, em in 0u32..60) {
            let duration = duration_hours(t(sh, sm), t(eh, em));
            prop_assert!(duration > 0.0);
        }

        #[test]
        fn price_is_rate_times_duration(rate in 1.0f64..500.0, sh in 0u32..24, eh in 0u32..24) {
            let start = t(sh, 0);
            let end = t(eh, 0);
            let quote = quote(rate, start, end);
            prop_assert_eq!(quote.price, rate * quote.duration);
        }
    }
}
