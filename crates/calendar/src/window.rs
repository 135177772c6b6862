//! Calibration windows: the period range used to fit reference distributions.

use std::ops::Range;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::periodicity::Periodicity;

/// Half-open range `[start, end)` of period indices within a series.
///
/// The window is only a pair of indices; whether it fits a particular series
/// is checked by the consumer against the series length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalibrationWindow {
    start: usize,
    end: usize,
}

impl CalibrationWindow {
    /// Creates a window covering periods `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Window covering a whole record of `len` periods.
    pub fn full(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    /// Window covering the inclusive calendar years `first_year..=last_year`
    /// of a series of `len` periods starting at `series_start`.
    ///
    /// Years partly outside the record are clipped to it. For monthly series
    /// only the year and month of `series_start` are used.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidYearRange`] if `first_year > last_year`
    /// and [`CalendarError::CalibrationOutsideRecord`] if the clipped window
    /// is empty.
    pub fn from_years(
        periodicity: Periodicity,
        series_start: NaiveDate,
        len: usize,
        first_year: i32,
        last_year: i32,
    ) -> Result<Self, CalendarError> {
        if first_year > last_year {
            return Err(CalendarError::InvalidYearRange {
                first_year,
                last_year,
            });
        }
        let outside = CalendarError::CalibrationOutsideRecord {
            first_year,
            last_year,
        };

        let start = period_offset(periodicity, series_start, first_year).ok_or(outside.clone())?;
        let end = period_offset(periodicity, series_start, last_year + 1).ok_or(outside.clone())?;

        let start = start.clamp(0, len as i64) as usize;
        let end = end.clamp(0, len as i64) as usize;
        if start >= end {
            return Err(outside);
        }
        Ok(Self { start, end })
    }

    /// First period index of the window.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last period index of the window.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of periods covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the window covers no periods.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if period index `i` lies inside the window.
    pub fn contains(&self, i: usize) -> bool {
        (self.start..self.end).contains(&i)
    }

    /// The window as a `Range`.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Signed number of periods between `series_start` and January 1 of `year`.
fn period_offset(periodicity: Periodicity, series_start: NaiveDate, year: i32) -> Option<i64> {
    match periodicity {
        Periodicity::Monthly => {
            let months = (year as i64 - series_start.year() as i64) * 12;
            Some(months - series_start.month0() as i64)
        }
        Periodicity::Daily => {
            let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
            Some(jan1.signed_duration_since(series_start).num_days())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn full_window() {
        let w = CalibrationWindow::full(24);
        assert_eq!(w.range(), 0..24);
        assert_eq!(w.len(), 24);
        assert!(w.contains(0));
        assert!(!w.contains(24));
    }

    #[test]
    fn monthly_years() {
        // 1981-01 .. 2020-12, calibrate on 1991..=2000
        let w = CalibrationWindow::from_years(Periodicity::Monthly, date(1981, 1, 1), 480, 1991, 2000)
            .unwrap();
        assert_eq!(w.start(), 120);
        assert_eq!(w.end(), 240);
    }

    #[test]
    fn monthly_years_mid_year_start() {
        // Record starts in July: January of the next year is offset 6.
        let w = CalibrationWindow::from_years(Periodicity::Monthly, date(1980, 7, 1), 30, 1981, 1981)
            .unwrap();
        assert_eq!(w.range(), 6..18);
    }

    #[test]
    fn daily_years() {
        let w = CalibrationWindow::from_years(Periodicity::Daily, date(2000, 1, 1), 1096, 2001, 2001)
            .unwrap();
        // 2000 is a leap year.
        assert_eq!(w.range(), 366..731);
    }

    #[test]
    fn clipped_to_record() {
        let w = CalibrationWindow::from_years(Periodicity::Monthly, date(1981, 1, 1), 24, 1970, 2050)
            .unwrap();
        assert_eq!(w.range(), 0..24);
    }

    #[test]
    fn outside_record() {
        let err = CalibrationWindow::from_years(Periodicity::Monthly, date(1981, 1, 1), 24, 1990, 1995)
            .unwrap_err();
        assert!(matches!(err, CalendarError::CalibrationOutsideRecord { .. }));
    }

    #[test]
    fn reversed_years() {
        let err = CalibrationWindow::from_years(Periodicity::Monthly, date(1981, 1, 1), 24, 1982, 1981)
            .unwrap_err();
        assert_eq!(
            err,
            CalendarError::InvalidYearRange {
                first_year: 1982,
                last_year: 1981
            }
        );
    }
}
