//! Calendar position tags for a contiguous series.

use chrono::{Datelike, NaiveDate};

use crate::periodicity::Periodicity;

/// Daily position (1..=366) of `date` in the fixed 366-day layout.
///
/// In non-leap years every day after February 28 is shifted forward by one,
/// so March 1 is always position 61 and position 60 only ever holds
/// February 29.
pub fn day_position(date: NaiveDate) -> u16 {
    let ordinal = date.ordinal() as u16;
    if !is_leap_year(date.year()) && ordinal > 59 {
        ordinal + 1
    } else {
        ordinal
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Calendar positions for a contiguous series of `len` periods starting at
/// `start`.
///
/// For monthly series only the month of `start` matters; the day is ignored.
pub fn positions(periodicity: Periodicity, start: NaiveDate, len: usize) -> Vec<u16> {
    match periodicity {
        Periodicity::Monthly => {
            let first = start.month0() as usize;
            (0..len).map(|i| ((first + i) % 12 + 1) as u16).collect()
        }
        Periodicity::Daily => start.iter_days().take(len).map(day_position).collect(),
    }
}
