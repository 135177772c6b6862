//! Solar geometry after FAO Irrigation and Drainage Paper 56 (eqs. 21–25, 34).

use std::f64::consts::PI;

use crate::error::PetError;

/// Solar constant in MJ m⁻² min⁻¹.
const SOLAR_CONSTANT: f64 = 0.0820;

/// Converts radiation in MJ m⁻² day⁻¹ to equivalent evaporation in mm day⁻¹.
pub(crate) const MJ_TO_MM: f64 = 0.408;

/// Validates a latitude in degrees and returns it in radians.
pub fn latitude_radians(latitude: f64) -> Result<f64, PetError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(PetError::InvalidLatitude { latitude });
    }
    Ok(latitude.to_radians())
}

/// Solar declination (radians) on day-of-year `day`.
pub fn solar_declination(day: u16) -> f64 {
    0.409 * (2.0 * PI * day as f64 / 365.0 - 1.39).sin()
}

/// Inverse relative Earth–Sun distance on day-of-year `day`.
pub fn inverse_relative_distance(day: u16) -> f64 {
    1.0 + 0.033 * (2.0 * PI * day as f64 / 365.0).cos()
}

/// Sunset hour angle (radians). Polar day and polar night saturate at π and 0.
pub fn sunset_hour_angle(lat_rad: f64, declination: f64) -> f64 {
    (-lat_rad.tan() * declination.tan()).clamp(-1.0, 1.0).acos()
}

/// Maximum possible daylight hours on day-of-year `day`.
pub fn daylight_hours(lat_rad: f64, day: u16) -> f64 {
    24.0 / PI * sunset_hour_angle(lat_rad, solar_declination(day))
}

/// Extraterrestrial radiation Ra (MJ m⁻² day⁻¹) on day-of-year `day`.
pub fn extraterrestrial_radiation(lat_rad: f64, day: u16) -> f64 {
    let decl = solar_declination(day);
    let ws = sunset_hour_angle(lat_rad, decl);
    let dr = inverse_relative_distance(day);
    let ra = 24.0 * 60.0 / PI
        * SOLAR_CONSTANT
        * dr
        * (ws * lat_rad.sin() * decl.sin() + lat_rad.cos() * decl.cos() * ws.sin());
    ra.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fao56_example_8() {
        // 3 September (J = 246) at 20°S.
        let lat = latitude_radians(-20.0).unwrap();
        assert_relative_eq!(inverse_relative_distance(246), 0.985, epsilon = 1e-3);
        assert_relative_eq!(solar_declination(246), 0.120, epsilon = 1e-3);
        assert_relative_eq!(
            sunset_hour_angle(lat, solar_declination(246)),
            1.527,
            epsilon = 1e-3
        );
        assert_relative_eq!(extraterrestrial_radiation(lat, 246), 32.2, epsilon = 0.1);
    }

    #[test]
    fn fao56_example_9_daylight() {
        // Same location/date as example 8: N = 11.7 hours.
        let lat = latitude_radians(-20.0).unwrap();
        assert_relative_eq!(daylight_hours(lat, 246), 11.7, epsilon = 0.05);
    }

    #[test]
    fn equator_is_twelve_hours() {
        for day in [1u16, 100, 200, 300] {
            assert_relative_eq!(daylight_hours(0.0, day), 12.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn polar_night_and_day() {
        let north = latitude_radians(89.0).unwrap();
        // Mid-December: no sun; mid-June: continuous daylight.
        assert_relative_eq!(daylight_hours(north, 350), 0.0, epsilon = 1e-9);
        assert_relative_eq!(daylight_hours(north, 172), 24.0, epsilon = 1e-9);
        assert_eq!(extraterrestrial_radiation(north, 350), 0.0);
    }

    #[test]
    fn latitude_validation() {
        assert!(latitude_radians(90.0).is_ok());
        assert!(latitude_radians(-90.5).is_err());
        assert!(latitude_radians(f64::NAN).is_err());
    }
}
