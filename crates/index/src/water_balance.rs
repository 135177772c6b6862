//! Climatic water balance (precipitation minus potential evapotranspiration).

use crate::error::IndexError;

/// Element-wise `precip - pet`; missing if either side is missing.
///
/// # Errors
///
/// Returns [`IndexError::MisalignedSeries`] if the series differ in length.
pub fn water_balance(precip: &[f64], pet: &[f64]) -> Result<Vec<f64>, IndexError> {
    if precip.len() != pet.len() {
        return Err(IndexError::MisalignedSeries {
            reason: format!(
                "precipitation has {} periods, PET has {}",
                precip.len(),
                pet.len()
            ),
        });
    }
    Ok(precip.iter().zip(pet).map(|(p, e)| p - e).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference() {
        let d = water_balance(&[10.0, 5.0, f64::NAN, 3.0], &[4.0, 8.0, 1.0, f64::NAN]).unwrap();
        assert_eq!(d[0], 6.0);
        assert_eq!(d[1], -3.0);
        assert!(d[2].is_nan());
        assert!(d[3].is_nan());
    }

    #[test]
    fn misaligned() {
        assert!(matches!(
            water_balance(&[1.0, 2.0], &[1.0]),
            Err(IndexError::MisalignedSeries { .. })
        ));
    }
}
