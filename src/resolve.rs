use crate::holiday::{HolidayDefinition, HolidayRule};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt;

/// Years outside this range are rejected before any rule runs.
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    InvalidYear(i32),
    InvalidDate { month: u32, day: u32 },
    NoSuchOccurrence { month: u32, weekday: Weekday, nth: u32 },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InvalidYear(year) => {
                write!(f, "year {year} is outside the supported range {MIN_YEAR}-{MAX_YEAR}")
            }
            ResolveError::InvalidDate { month, day } => {
                write!(f, "invalid calendar date: month {month}, day {day}")
            }
            ResolveError::NoSuchOccurrence { month, weekday, nth } => {
                write!(f, "no {nth}{} {weekday} in month {month}", ordinal_suffix(*nth))
            }
        }
    }
}

impl std::error::Error for ResolveError {}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// A holiday definition evaluated for one concrete year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHoliday {
    pub name: String,
    pub date: NaiveDate,
}

/// Evaluate a holiday definition for a given year.
///
/// The observance shift, when requested, runs strictly after the rule has
/// produced a date: it depends on the resolved weekday, not on anything in
/// the rule itself. Pure function; callers may memoize the result.
pub fn resolve(def: &HolidayDefinition, year: i32) -> ResolveResult<ResolvedHoliday> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ResolveError::InvalidYear(year));
    }

    let date = match def.rule {
        HolidayRule::FixedDate { month, day } => NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ResolveError::InvalidDate { month, day })?,
        HolidayRule::NthWeekday { month, weekday, nth } => nth_weekday(year, month, weekday, nth)?,
        HolidayRule::LastWeekday { month, weekday } => last_weekday(year, month, weekday)?,
        HolidayRule::Easter => easter_sunday(year),
    };

    let date = if def.observed { shift_observed(date) } else { date };

    Ok(ResolvedHoliday {
        name: def.name.clone(),
        date,
    })
}

/// Find the nth occurrence of a weekday in a month, 1-indexed.
///
/// Months have four or five occurrences of each weekday; asking for an nth
/// beyond that is an error, never a silent spill into the next month.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, nth: u32) -> ResolveResult<NaiveDate> {
    let mut date = first_of_month(year, month)?;
    let mut count = 0;

    while date.month() == month {
        if date.weekday() == weekday {
            count += 1;
            if count == nth {
                return Ok(date);
            }
        }
        date = date + Duration::days(1);
    }

    Err(ResolveError::NoSuchOccurrence { month, weekday, nth })
}

/// Find the last occurrence of a weekday in a month.
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> ResolveResult<NaiveDate> {
    // Walk back from the last day of the month.
    let mut date = match first_of_month(year, month)?.checked_add_months(chrono::Months::new(1)) {
        Some(next) => next - Duration::days(1),
        None => return Err(ResolveError::InvalidDate { month, day: 1 }),
    };
    while date.weekday() != weekday {
        date = date - Duration::days(1);
    }
    Ok(date)
}

/// Easter Sunday for a year, via the anonymous Gregorian computus.
///
/// Integer arithmetic over the metonic cycle, century corrections and the
/// epact; the result always lands between March 22 and April 25.
pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("computus produced an invalid date")
}

/// Apply the US federal weekend observance shift.
///
/// Saturday moves to the preceding Friday, Sunday to the following Monday.
/// Pure date arithmetic: a shift may cross a month or year boundary (Jan 1
/// on a Saturday is observed Dec 31 of the prior year) and is never clamped.
/// Applying the shift to a weekday date is a no-op, so the shift is
/// idempotent.
pub fn shift_observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

fn first_of_month(year: i32, month: u32) -> ResolveResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ResolveError::InvalidDate { month, day: 1 })
}
