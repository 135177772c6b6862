//! Hargreaves–Samani (1985) potential evapotranspiration.

use drought_calendar::{
    CalendarPosition, Periodicity, days_in_month, mid_month_position, ordinal_day,
};

use crate::error::PetError;
use crate::solar::{MJ_TO_MM, extraterrestrial_radiation, latitude_radians};

/// Hargreaves PET (mm/day) for one day with extraterrestrial radiation `ra`
/// (MJ m⁻² day⁻¹). A negative diurnal range is treated as zero.
pub fn hargreaves_daily(tmin: f64, tmax: f64, ra: f64) -> f64 {
    hargreaves_rate((tmin + tmax) / 2.0, tmin, tmax, ra)
}

fn hargreaves_rate(tmean: f64, tmin: f64, tmax: f64, ra: f64) -> f64 {
    if tmean.is_nan() || tmin.is_nan() || tmax.is_nan() || ra.is_nan() {
        return f64::NAN;
    }
    let range = (tmax - tmin).max(0.0);
    (0.0023 * MJ_TO_MM * ra * (tmean + 17.8) * range.sqrt()).max(0.0)
}

/// Potential evapotranspiration after Hargreaves from daily or monthly
/// minimum/maximum temperature (°C).
///
/// `tmean` defaults to the midpoint of `tmin` and `tmax` when not supplied.
///
/// Daily series return mm/day with radiation evaluated on the day of year
/// of each position (see [`ordinal_day`]). Monthly series evaluate radiation
/// at mid-month and return mm/month.
///
/// # Errors
///
/// Returns [`PetError`] on empty input, mismatched lengths, positions
/// invalid for `periodicity`, or an invalid latitude.
#[tracing::instrument(skip(tmin, tmax, tmean, positions))]
pub fn hargreaves(
    tmin: &[f64],
    tmax: &[f64],
    tmean: Option<&[f64]>,
    positions: &[u16],
    periodicity: Periodicity,
    latitude: f64,
) -> Result<Vec<f64>, PetError> {
    if tmin.is_empty() {
        return Err(PetError::EmptyData);
    }
    let tmean_len = tmean.map_or(tmin.len(), <[f64]>::len);
    for (len, field) in [
        (tmax.len(), "tmax"),
        (tmean_len, "tmean"),
        (positions.len(), "positions"),
    ] {
        if len != tmin.len() {
            return Err(PetError::LengthMismatch {
                field,
                expected: tmin.len(),
                got: len,
            });
        }
    }
    let lat_rad = latitude_radians(latitude)?;

    let mut pet = Vec::with_capacity(tmin.len());
    for (i, ((&lo, &hi), &p)) in tmin.iter().zip(tmax).zip(positions).enumerate() {
        CalendarPosition::new(p, periodicity)?;
        let mean = tmean.map_or((lo + hi) / 2.0, |t| t[i]);
        let value = match periodicity {
            Periodicity::Daily => {
                let ra = extraterrestrial_radiation(lat_rad, ordinal_day(p)?);
                hargreaves_rate(mean, lo, hi, ra)
            }
            Periodicity::Monthly => {
                let month = p as u8;
                let day = ordinal_day(mid_month_position(month)?)?;
                let ra = extraterrestrial_radiation(lat_rad, day);
                hargreaves_rate(mean, lo, hi, ra) * days_in_month(month)? as f64
            }
        };
        pet.push(value);
    }
    Ok(pet)
}
