//! Error types for the drought-index crate.

use drought_calendar::CalendarError;

/// Error type for all fallible operations in the drought-index crate.
///
/// Per-position conditions (`InsufficientCalibrationData`,
/// `DegenerateDistribution`) are also reported inside successful results so
/// one bad calendar position never aborts the rest of the series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    /// Returned when input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the value and position slices differ in length.
    #[error("length mismatch: values has {values_len} elements, positions has {positions_len}")]
    LengthMismatch {
        /// Length of the value slice.
        values_len: usize,
        /// Length of the calendar position slice.
        positions_len: usize,
    },

    /// Returned when the accumulation scale is zero.
    #[error("invalid scale: {scale} (must be >= 1)")]
    InvalidScale {
        /// The rejected scale.
        scale: usize,
    },

    /// Returned when the calibration window is empty or extends past the series.
    #[error("invalid calibration window {start}..{end} for a series of {len} periods")]
    InvalidCalibrationWindow {
        /// First period index of the window.
        start: usize,
        /// One past the last period index of the window.
        end: usize,
        /// Length of the series.
        len: usize,
    },

    /// Returned when a calendar position has too few usable calibration samples.
    #[error(
        "insufficient calibration data at position {position}: {n_samples} usable samples, {required} required"
    )]
    InsufficientCalibrationData {
        /// 1-based calendar position.
        position: u16,
        /// Number of usable samples found.
        n_samples: usize,
        /// Configured minimum.
        required: usize,
    },

    /// Reported when a position's calibration sample is degenerate.
    ///
    /// For Pearson III and normal fits this is a quality flag: a fallback
    /// distribution is still used. For gamma fits on a constant positive
    /// sample the position cannot be standardized.
    #[error("degenerate distribution at position {position}: {reason}")]
    DegenerateDistribution {
        /// 1-based calendar position.
        position: u16,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when precipitation and PET series cannot be paired.
    #[error("misaligned series: {reason}")]
    MisalignedSeries {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a statrs distribution cannot be constructed.
    ///
    /// The `message` field is a `String` because statrs errors do not
    /// implement `Clone`.
    #[error("{family} construction failed at position {position}: {message}")]
    DistributionConstruction {
        /// Distribution family name.
        family: &'static str,
        /// 1-based calendar position.
        position: u16,
        /// Description of the failure.
        message: String,
    },

    /// Returned when a calendar position is invalid.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
