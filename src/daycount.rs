// src/daycount.rs
//! Calendar helpers for turning dates into year fractions.
//!
//! Dashboard inputs are usually entered as "days to expiry" or as a pair of
//! dates. All maturities in this crate use ACT/365 Fixed, matching the
//! `30/365` convention of the option and futures pages.

use crate::error::{QuantError, QuantResult};
use chrono::NaiveDate;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Year fraction for a number of calendar days
pub fn days_to_years(days: f64) -> f64 {
    days / DAYS_PER_YEAR
}

/// ACT/365 Fixed year fraction between two dates
///
/// Fails with `InvalidInput` when `end` is before `start`.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> QuantResult<f64> {
    let days = (end - start).num_days();
    if days < 0 {
        return Err(QuantError::InvalidInput {
            parameter: "end".to_string(),
            value: days as f64,
            constraint: format!("end date {} precedes start date {}", end, start),
        });
    }
    Ok(days_to_years(days as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_days() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date");
        let t = year_fraction(start, end).expect("ordered dates");
        assert!((t - 30.0 / 365.0).abs() < 1e-15);
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        assert!(year_fraction(start, end).is_err());
    }

    #[test]
    fn test_same_day_is_zero() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 14).expect("valid date");
        assert_eq!(year_fraction(day, day), Ok(0.0));
    }
}
