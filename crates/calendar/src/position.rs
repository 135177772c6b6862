//! Calendar position newtype and month tables for the 366-day position layout.

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::periodicity::Periodicity;

/// Number of days in each month of a non-leap year (index 0 unused,
/// index 1 = January, ..., index 12 = December).
pub(crate) const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Daily position on which each month starts in the 366-day layout (index 0
/// unused). February 29 is always position 60, March 1 always position 61.
pub(crate) const MONTH_START_POSITION: [u16; 13] =
    [0, 1, 32, 61, 92, 122, 153, 183, 214, 245, 275, 306, 336];

/// Daily position reserved for February 29.
pub(crate) const LEAP_DAY_POSITION: u16 = 60;

/// Within-year slot of an observation: a month (1..=12) for monthly series
/// or a day (1..=366) for daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarPosition(u16);

impl CalendarPosition {
    /// Creates a position after checking it is valid for `periodicity`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidPosition`] if `position` is not in
    /// `1..=periodicity.n_positions()`.
    pub fn new(position: u16, periodicity: Periodicity) -> Result<Self, CalendarError> {
        let max = periodicity.n_positions();
        if !(1..=max).contains(&position) {
            return Err(CalendarError::InvalidPosition { position, max });
        }
        Ok(Self(position))
    }

    /// Returns the inner 1-based position.
    pub fn get(self) -> u16 {
        self.0
    }

    /// Returns the 0-based index suitable for array indexing.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

/// Checks every entry of `positions` against `periodicity`.
///
/// # Errors
///
/// Returns the first [`CalendarError::InvalidPosition`] encountered.
pub fn validate_positions(positions: &[u16], periodicity: Periodicity) -> Result<(), CalendarError> {
    for &p in positions {
        CalendarPosition::new(p, periodicity)?;
    }
    Ok(())
}

/// Number of days in `month` for a non-leap year.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
pub fn days_in_month(month: u8) -> Result<u8, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    Ok(DAYS_PER_MONTH[month as usize])
}

/// Month (1..=12) containing a daily position of the 366-day layout.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidPosition`] if `position` is not in 1..=366.
pub fn month_of_day_position(position: u16) -> Result<u8, CalendarError> {
    CalendarPosition::new(position, Periodicity::Daily)?;
    let month = MONTH_START_POSITION[1..]
        .iter()
        .rposition(|&start| start <= position)
        .map(|i| i + 1)
        .unwrap_or(1);
    Ok(month as u8)
}

/// Daily position of the 15th of `month`, used to evaluate day-based
/// formulas for monthly series.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
pub fn mid_month_position(month: u8) -> Result<u16, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    Ok(MONTH_START_POSITION[month as usize] + 14)
}

/// Day of year (1..=366) of a daily position of the 366-day layout.
///
/// Position 60 (February 29) is day 60 of a leap year. Later positions map
/// to their common-year ordinal, so March 1 is day 60 rather than 61.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidPosition`] if `position` is not in 1..=366.
pub fn ordinal_day(position: u16) -> Result<u16, CalendarError> {
    CalendarPosition::new(position, Periodicity::Daily)?;
    Ok(if position > LEAP_DAY_POSITION {
        position - 1
    } else {
        position
    })
}
