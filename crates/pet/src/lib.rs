//! Potential evapotranspiration (PET) estimators.
//!
//! PET feeds the climatic water balance (precipitation minus PET) that the
//! SPEI standardizes. Both estimators are closed-form and stateless:
//!
//! - [`thornthwaite`]: monthly mean temperature and latitude only.
//! - [`hargreaves`]: minimum/maximum temperature plus extraterrestrial
//!   radiation derived from latitude and day of year.
//!
//! Missing temperatures (NaN) produce missing PET at the same position.
//!
//! # Quick Start
//!
//! ```
//! use drought_pet::thornthwaite;
//!
//! let temps = [2.0, 4.0, 8.0, 12.0, 16.0, 20.0, 23.0, 22.0, 18.0, 12.0, 7.0, 3.0];
//! let months: Vec<u16> = (1..=12).collect();
//! let pet = thornthwaite(&temps, &months, 40.0).unwrap();
//! assert!(pet[6] > pet[0]);
//! ```

mod error;
mod hargreaves;
mod solar;
mod thornthwaite;

use std::str::FromStr;

pub use error::PetError;
pub use hargreaves::{hargreaves, hargreaves_daily};
pub use solar::{
    daylight_hours, extraterrestrial_radiation, latitude_radians, solar_declination,
    sunset_hour_angle,
};
pub use thornthwaite::{heat_index, thornthwaite, thornthwaite_exponent};

/// Selects a PET estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PetMethod {
    /// Temperature-only monthly estimator.
    #[default]
    Thornthwaite,
    /// Temperature range plus extraterrestrial radiation.
    Hargreaves,
}

impl FromStr for PetMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thornthwaite" => Ok(PetMethod::Thornthwaite),
            "hargreaves" => Ok(PetMethod::Hargreaves),
            other => Err(format!("unknown PET method: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_method() {
        assert_eq!("Hargreaves".parse(), Ok(PetMethod::Hargreaves));
        assert_eq!("thornthwaite".parse(), Ok(PetMethod::Thornthwaite));
        assert!("penman".parse::<PetMethod>().is_err());
    }
}
