//! Error types for the drought-calendar crate.

/// Error type for all fallible operations in the drought-calendar crate.
///
/// Covers validation of calendar positions, months, periodicity names and
/// calibration year ranges.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a calendar position is outside `1..=max`.
    #[error("invalid calendar position: {position} (must be 1..={max})")]
    InvalidPosition {
        /// The invalid position value that was provided.
        position: u16,
        /// The largest valid position for the periodicity.
        max: u16,
    },

    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a periodicity name is not recognised.
    #[error("unknown periodicity: {name:?} (expected \"monthly\" or \"daily\")")]
    UnknownPeriodicity {
        /// The name that failed to parse.
        name: String,
    },

    /// Returned when the first calibration year is after the last.
    #[error("invalid calibration years: first year {first_year} is after last year {last_year}")]
    InvalidYearRange {
        /// First calibration year.
        first_year: i32,
        /// Last calibration year.
        last_year: i32,
    },

    /// Returned when a calibration year range does not overlap the record.
    #[error("calibration years {first_year}..={last_year} do not overlap the record")]
    CalibrationOutsideRecord {
        /// First calibration year.
        first_year: i32,
        /// Last calibration year.
        last_year: i32,
    },
}
