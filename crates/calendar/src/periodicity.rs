//! Series periodicity: how many calendar positions make up one year.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Time step of a climate series.
///
/// Monthly series group observations into 12 calendar positions, daily
/// series into 366 (a fixed leap-year layout, see [`crate::day_position`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    /// One value per calendar month.
    #[default]
    Monthly,
    /// One value per calendar day.
    Daily,
}

impl Periodicity {
    /// Number of calendar positions per year (12 or 366).
    pub fn n_positions(self) -> u16 {
        match self {
            Periodicity::Monthly => 12,
            Periodicity::Daily => 366,
        }
    }

    /// Lower-case name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Periodicity::Monthly => "monthly",
            Periodicity::Daily => "daily",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Periodicity {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(Periodicity::Monthly),
            "daily" | "day" => Ok(Periodicity::Daily),
            other => Err(CalendarError::UnknownPeriodicity {
                name: other.to_string(),
            }),
        }
    }
}
