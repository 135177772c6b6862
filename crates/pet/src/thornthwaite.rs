//! Thornthwaite (1948) monthly potential evapotranspiration.

use drought_calendar::{
    CalendarPosition, Periodicity, days_in_month, mid_month_position, ordinal_day,
};
use tracing::debug;

use crate::error::PetError;
use crate::solar::{daylight_hours, latitude_radians};

/// Annual heat index `I = Σ (T_m / 5)^1.514` over the twelve climatological
/// monthly mean temperatures, skipping months at or below freezing and
/// months with no data.
pub fn heat_index(monthly_means: &[f64; 12]) -> f64 {
    monthly_means
        .iter()
        .filter(|t| t.is_finite() && **t > 0.0)
        .map(|&t| (t / 5.0).powf(1.514))
        .sum()
}

/// Thornthwaite exponent `a` as a cubic in the heat index.
pub fn thornthwaite_exponent(heat_index: f64) -> f64 {
    6.75e-7 * heat_index.powi(3) - 7.71e-5 * heat_index.powi(2) + 1.792e-2 * heat_index + 0.49239
}

/// Climatological mean temperature per calendar month, ignoring missing values.
fn monthly_means(temp_c: &[f64], months: &[u16]) -> [f64; 12] {
    let mut samples: [Vec<f64>; 12] = Default::default();
    for (&t, &m) in temp_c.iter().zip(months) {
        if t.is_finite() {
            samples[(m - 1) as usize].push(t);
        }
    }
    samples.map(|s| {
        if s.is_empty() {
            f64::NAN
        } else {
            drought_stats::mean(&s)
        }
    })
}

/// Mean daylight hours over the days of `month` at the given latitude.
fn mean_daylight_hours(lat_rad: f64, month: u8) -> Result<f64, PetError> {
    let n_days = days_in_month(month)? as u16;
    let first = ordinal_day(mid_month_position(month)?)? - 14;
    let total: f64 = (first..first + n_days)
        .map(|day| daylight_hours(lat_rad, day))
        .sum();
    Ok(total / n_days as f64)
}

/// Monthly potential evapotranspiration (mm/month) after Thornthwaite.
///
/// `months` holds the calendar month (1..=12) of each value in `temp_c`
/// (mean monthly air temperature, °C). The heat index is computed from the
/// climatological monthly means of the whole record. Months at or below
/// 0 °C yield zero PET; missing temperatures yield missing PET.
///
/// # Errors
///
/// Returns [`PetError`] on empty input, mismatched lengths, months outside
/// 1..=12, or an invalid latitude.
#[tracing::instrument(skip(temp_c, months))]
pub fn thornthwaite(temp_c: &[f64], months: &[u16], latitude: f64) -> Result<Vec<f64>, PetError> {
    if temp_c.is_empty() {
        return Err(PetError::EmptyData);
    }
    if months.len() != temp_c.len() {
        return Err(PetError::LengthMismatch {
            field: "months",
            expected: temp_c.len(),
            got: months.len(),
        });
    }
    for &m in months {
        CalendarPosition::new(m, Periodicity::Monthly)?;
    }
    let lat_rad = latitude_radians(latitude)?;

    let heat = heat_index(&monthly_means(temp_c, months));
    let exponent = thornthwaite_exponent(heat);
    debug!(heat_index = heat, exponent, "thornthwaite coefficients");

    let mut daylight = [0.0; 12];
    for (i, slot) in daylight.iter_mut().enumerate() {
        *slot = mean_daylight_hours(lat_rad, (i + 1) as u8)?;
    }

    let mut pet = Vec::with_capacity(temp_c.len());
    for (&t, &m) in temp_c.iter().zip(months) {
        let value = if t.is_nan() {
            f64::NAN
        } else if t <= 0.0 || heat <= 0.0 {
            0.0
        } else {
            let n_days = days_in_month(m as u8)? as f64;
            let hours = daylight[(m - 1) as usize];
            16.0 * (hours / 12.0) * (n_days / 30.0) * (10.0 * t / heat).powf(exponent)
        };
        pet.push(value);
    }
    Ok(pet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn heat_index_skips_cold_and_missing() {
        let mut means = [5.0; 12];
        means[0] = -3.0;
        means[1] = f64::NAN;
        // Ten months at 5 °C contribute 1 each.
        assert_relative_eq!(heat_index(&means), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn exponent_reference_value() {
        // 0.084375 - 0.19275 + 0.896 + 0.49239
        assert_relative_eq!(thornthwaite_exponent(50.0), 1.280015, epsilon = 1e-9);
    }

    #[test]
    fn equator_constant_temperature() {
        // Constant 25 °C at the equator: I = 12 * 5^1.514, L = 12 h.
        let temps = vec![25.0; 12];
        let months: Vec<u16> = (1..=12).collect();
        let pet = thornthwaite(&temps, &months, 0.0).unwrap();

        let heat = 12.0 * 5f64.powf(1.514);
        let a = thornthwaite_exponent(heat);
        let base = 16.0 * (250.0 / heat).powf(a);
        assert_relative_eq!(pet[0], base * 31.0 / 30.0, epsilon = 1e-6);
        assert_relative_eq!(pet[1], base * 28.0 / 30.0, epsilon = 1e-6);
        assert_relative_eq!(pet[3], base, epsilon = 1e-6);
    }

    #[test]
    fn freezing_and_missing() {
        let temps = vec![-5.0, 0.0, 10.0, f64::NAN];
        let months = vec![1, 2, 3, 4];
        let pet = thornthwaite(&temps, &months, 45.0).unwrap();
        assert_eq!(pet[0], 0.0);
        assert_eq!(pet[1], 0.0);
        assert!(pet[2] > 0.0);
        assert!(pet[3].is_nan());
    }

    #[test]
    fn all_freezing_yields_zero() {
        let temps = vec![-10.0; 12];
        let months: Vec<u16> = (1..=12).collect();
        let pet = thornthwaite(&temps, &months, 60.0).unwrap();
        assert!(pet.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn errors() {
        assert_eq!(thornthwaite(&[], &[], 0.0), Err(PetError::EmptyData));
        assert!(matches!(
            thornthwaite(&[1.0], &[1, 2], 0.0),
            Err(PetError::LengthMismatch { .. })
        ));
        assert!(matches!(
            thornthwaite(&[1.0], &[13], 0.0),
            Err(PetError::Calendar(_))
        ));
        assert!(matches!(
            thornthwaite(&[1.0], &[1], 100.0),
            Err(PetError::InvalidLatitude { .. })
        ));
    }

    #[test]
    fn march_daylight_starts_on_day_60() {
        let lat = latitude_radians(52.0).unwrap();
        let expected = (60..=90).map(|day| daylight_hours(lat, day)).sum::<f64>() / 31.0;
        assert_relative_eq!(mean_daylight_hours(lat, 3).unwrap(), expected, epsilon = 1e-12);
    }
}
