//! Error types for the drought-pet crate.

use drought_calendar::CalendarError;

/// Error type for all fallible operations in the drought-pet crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PetError {
    /// Returned when the input temperature series is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when a latitude is non-finite or outside [-90, 90].
    #[error("invalid latitude: {latitude} (must be finite and within [-90, 90])")]
    InvalidLatitude {
        /// The offending latitude in degrees.
        latitude: f64,
    },

    /// Returned when a companion slice differs in length from the temperature series.
    #[error("length mismatch: {field} has {got} elements, expected {expected}")]
    LengthMismatch {
        /// Name of the mismatched input.
        field: &'static str,
        /// Length of the leading temperature series.
        expected: usize,
        /// Length of the mismatched input.
        got: usize,
    },

    /// Returned when a calendar position is invalid.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
