//! Serial day-number date arithmetic.
//!
//! The curve model and the instruments index everything by *day numbers*:
//! a date expressed as a floating-point count of days from the Common Era
//! epoch. Keeping the model layer in plain `f64` day numbers means knot
//! dates, cash flow dates and year fractions all live in the same numeric
//! space as the solver parameters; `chrono` calendar dates appear only at
//! the data boundary.

use chrono::{Days, NaiveDate};

/// Average days per year used for all year-fraction calculations.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Converts a calendar date to its serial day number.
#[must_use]
pub fn day_number(date: NaiveDate) -> f64 {
    f64::from(chrono::Datelike::num_days_from_ce(&date))
}

/// Converts a serial day number back to a calendar date.
///
/// Fractional day numbers are truncated. Returns `None` when the day number
/// is outside the representable calendar range.
#[must_use]
pub fn date_from_day_number(day: f64) -> Option<NaiveDate> {
    if !day.is_finite() || day < 1.0 {
        return None;
    }

    let days = day.trunc() as u64;
    NaiveDate::from_ymd_opt(1, 1, 1)?.checked_add_days(Days::new(days - 1))
}

/// Year fraction between two day numbers on a 365.25-day year.
#[must_use]
pub fn year_fraction(from: f64, to: f64) -> f64 {
    (to - from) / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_day_number_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let day = day_number(date);
        assert_eq!(date_from_day_number(day), Some(date));
    }

    #[test]
    fn test_day_number_ordering() {
        let earlier = day_number(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        let later = day_number(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert!(later > earlier);
        assert_relative_eq!(later - earlier, 3653.0); // incl. leap days
    }

    #[test]
    fn test_year_fraction() {
        assert_relative_eq!(year_fraction(0.0, 365.25), 1.0);
        assert_relative_eq!(year_fraction(100.0, 100.0), 0.0);
        assert!(year_fraction(200.0, 100.0) < 0.0);
    }

    #[test]
    fn test_invalid_day_numbers() {
        assert_eq!(date_from_day_number(f64::NAN), None);
        assert_eq!(date_from_day_number(-5.0), None);
        assert_eq!(date_from_day_number(0.0), None);
    }
}
