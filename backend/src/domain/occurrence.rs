//! Occurrence arithmetic for yearly events.
//!
//! Works out how many days remain until a stored date comes round again and
//! how old someone born on that date is. Everything here is pure: "today" is
//! always passed in, never read from the system clock.
//!
//! ## Day counting
//!
//! The day count is not a calendar-exact difference. The interval from today to
//! the next occurrence is split into years, months and days the way a calendar
//! period is (months first, then the leftover days) and then flattened as
//! `years * 365 + months * 30 + days`. Near month boundaries this disagrees with
//! the real number of days, and clients depend on the flattened value, so it is
//! reproduced here exactly.

use chrono::{Datelike, Months, NaiveDate};

/// Values derived from a stored date relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceCalculation {
    pub days_until_next: i64,
    pub age: i32,
}

impl OccurrenceCalculation {
    /// Compute both derived values. `None` only if the next occurrence would
    /// fall outside the representable calendar range.
    pub fn calculate(stored: NaiveDate, today: NaiveDate) -> Option<Self> {
        Some(Self {
            days_until_next: days_until_next(stored, today)?,
            age: age(stored, today)?,
        })
    }
}

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Move `date` into `year`, turning February 29 into February 28 when `year`
/// has no leap day.
pub fn project_onto_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day()).or_else(|| {
        if date.month() == 2 && date.day() == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// The next date on or after `today` whose month/day matches `stored`.
///
/// Once this year's occurrence has passed, that (already clamped) date is
/// moved forward a year, so a Feb 29 that became Feb 28 stays Feb 28 even
/// when the following year is a leap year.
pub fn next_occurrence(stored: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = project_onto_year(stored, today.year())?;
    if this_year >= today {
        return Some(this_year);
    }
    this_year.checked_add_months(Months::new(12))
}

/// Days until the next occurrence of `stored`, 0 when it is today.
pub fn days_until_next(stored: NaiveDate, today: NaiveDate) -> Option<i64> {
    let next = next_occurrence(stored, today)?;
    if next == today {
        return Some(0);
    }

    let (years, months, days) = calendar_period(today, next)?;
    Some(years * 365 + months * 30 + days)
}

/// Whole years since `stored` as of `today`, never negative.
pub fn age(stored: NaiveDate, today: NaiveDate) -> Option<i32> {
    let mut years = today.year() - stored.year();
    let projected = project_onto_year(stored, today.year())?;
    if today.ordinal() < projected.ordinal() {
        years -= 1;
    }
    Some(years.max(0))
}

/// Split the interval `start..=end` into whole years, months and days.
///
/// Months are counted first; if the day of `end` is before the day of
/// `start`, one month is given back and the days are counted from the date
/// reached after the remaining months (clamped to month end). Requires
/// `start <= end`.
fn calendar_period(start: NaiveDate, end: NaiveDate) -> Option<(i64, i64, i64)> {
    debug_assert!(start <= end);

    let mut total_months = months_since_epoch(end) - months_since_epoch(start);
    let mut days = i64::from(end.day()) - i64::from(start.day());

    if total_months > 0 && days < 0 {
        total_months -= 1;
        let stepped = start.checked_add_months(Months::new(u32::try_from(total_months).ok()?))?;
        days = (end - stepped).num_days();
    }

    Some((total_months / 12, total_months % 12, days))
}

fn months_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_leap_year() {
        assert!(!is_leap_year(2025));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn test_project_onto_year_clamps_leap_day() {
        assert_eq!(project_onto_year(date(2000, 2, 29), 2025), Some(date(2025, 2, 28)));
        assert_eq!(project_onto_year(date(2000, 2, 29), 2028), Some(date(2028, 2, 29)));
        assert_eq!(project_onto_year(date(1990, 12, 31), 2025), Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_days_until_next_today_is_zero() {
        assert_eq!(days_until_next(date(2000, 6, 15), date(2025, 6, 15)), Some(0));
    }

    #[test]
    fn test_days_until_next_later_this_month() {
        assert_eq!(days_until_next(date(2000, 6, 20), date(2025, 6, 15)), Some(5));
        assert_eq!(days_until_next(date(2000, 1, 31), date(2025, 1, 30)), Some(1));
    }

    #[test]
    fn test_days_until_next_flattens_months_to_thirty_days() {
        // June has 30 days, so one month happens to be exact
        assert_eq!(days_until_next(date(2000, 7, 15), date(2025, 6, 15)), Some(30));
        // June + July is really 61 days
        assert_eq!(days_until_next(date(2000, 8, 15), date(2025, 6, 15)), Some(60));
        // Feb 28 -> Mar 31 is really 31 days
        assert_eq!(days_until_next(date(2000, 3, 31), date(2025, 2, 28)), Some(33));
    }

    #[test]
    fn test_days_until_next_borrows_month_with_clamped_step() {
        // Jan 31 + 1 month lands on Feb 28, then one more day to Mar 1
        assert_eq!(days_until_next(date(2000, 3, 1), date(2025, 1, 31)), Some(31));
    }

    #[test]
    fn test_days_until_next_already_passed_rolls_to_next_year() {
        // 11 months to May 15 2026, then 26 days to June 10
        assert_eq!(days_until_next(date(2000, 6, 10), date(2025, 6, 15)), Some(356));
        assert_eq!(days_until_next(date(1985, 1, 1), date(2025, 12, 31)), Some(1));
    }

    #[test]
    fn test_days_until_next_leap_day_in_common_year() {
        assert_eq!(days_until_next(date(2000, 2, 29), date(2025, 2, 28)), Some(0));
        // next occurrence is Feb 28 2026
        assert_eq!(days_until_next(date(2000, 2, 29), date(2025, 3, 1)), Some(357));
    }

    #[test]
    fn test_days_until_next_leap_day_in_leap_year() {
        assert_eq!(days_until_next(date(2000, 2, 29), date(2024, 2, 29)), Some(0));
        assert_eq!(days_until_next(date(2000, 2, 29), date(2024, 2, 28)), Some(1));
        // Feb 28 2027 has passed; moving it a year keeps Feb 28 2028
        assert_eq!(next_occurrence(date(2000, 2, 29), date(2027, 3, 1)), Some(date(2028, 2, 28)));
        assert_eq!(days_until_next(date(2000, 2, 29), date(2027, 3, 1)), Some(357));
        // Feb 29 2024 has passed; one year on clamps to Feb 28 2025
        assert_eq!(next_occurrence(date(2000, 2, 29), date(2024, 3, 1)), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_days_until_next_is_zero_only_on_matching_day() {
        let stored = date(1990, 4, 10);
        let mut today = date(2025, 1, 1);
        while today.year() == 2025 {
            let days = days_until_next(stored, today).unwrap();
            assert!(days >= 0);
            let same_day = today.month() == 4 && today.day() == 10;
            assert_eq!(days == 0, same_day, "today = {}", today);
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_age_before_and_on_birthday() {
        assert_eq!(age(date(2000, 6, 15), date(2025, 6, 14)), Some(24));
        assert_eq!(age(date(2000, 6, 15), date(2025, 6, 15)), Some(25));
        assert_eq!(age(date(2000, 6, 15), date(2025, 12, 1)), Some(25));
    }

    #[test]
    fn test_age_compares_projected_day_of_year() {
        // March 1 is day 61 in 2000 but day 60 in 2025
        assert_eq!(age(date(2000, 3, 1), date(2025, 3, 1)), Some(25));
        assert_eq!(age(date(2000, 2, 29), date(2025, 2, 28)), Some(25));
        assert_eq!(age(date(2000, 2, 29), date(2024, 2, 28)), Some(23));
    }

    #[test]
    fn test_age_never_negative() {
        assert_eq!(age(date(2026, 1, 1), date(2025, 6, 15)), Some(0));
        assert_eq!(age(date(2025, 6, 15), date(2025, 6, 15)), Some(0));
    }

    #[test]
    fn test_calculate_combines_both() {
        let calculation = OccurrenceCalculation::calculate(date(1990, 6, 20), date(2025, 6, 15)).unwrap();
        assert_eq!(calculation.days_until_next, 5);
        assert_eq!(calculation.age, 34);
    }
}
