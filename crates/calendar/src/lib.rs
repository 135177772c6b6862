//! # drought-calendar
//!
//! Calendar bookkeeping for drought index series: which within-year slot
//! each observation belongs to, and which periods form the calibration
//! window.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Periodicity"] -->|".n_positions()"| B["12 or 366"]
//!     C["series start + length"] -->|"positions()"| D["Vec of positions"]
//!     E["NaiveDate"] -->|"day_position()"| F["1..=366"]
//!     G["calibration years"] -->|"CalibrationWindow::from_years()"| H["[start, end)"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use drought_calendar::{CalibrationWindow, Periodicity, positions};
//!
//! let start = NaiveDate::from_ymd_opt(1981, 1, 1).unwrap();
//! let pos = positions(Periodicity::Monthly, start, 24);
//! assert_eq!(pos[12], 1);
//!
//! let window =
//!     CalibrationWindow::from_years(Periodicity::Monthly, start, 24, 1981, 1981).unwrap();
//! assert_eq!(window.range(), 0..12);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `periodicity` | Monthly / daily time step |
//! | `position` | Position newtype and month tables |
//! | `sequence` | Position tags for a contiguous series |
//! | `window` | Calibration window |
//! | `error` | Error types |

mod error;
mod periodicity;
mod position;
mod sequence;
mod window;

pub use error::CalendarError;
pub use periodicity::Periodicity;
pub use position::{
    CalendarPosition, days_in_month, mid_month_position, month_of_day_position,
    ordinal_day, validate_positions,
};
pub use sequence::{day_position, is_leap_year, positions};
pub use window::CalibrationWindow;
