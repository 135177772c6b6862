//! Percent of normal: each value relative to its position's calibration mean.

use drought_calendar::{CalibrationWindow, Periodicity};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::result::IndexSeries;

/// Calibration means per calendar position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionNormals {
    periodicity: Periodicity,
    window: CalibrationWindow,
    means: Vec<Option<f64>>,
    n_samples: Vec<usize>,
    required: usize,
}

impl PositionNormals {
    /// Periodicity the means were computed for.
    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Calibration window the means were computed on.
    pub fn window(&self) -> CalibrationWindow {
        self.window
    }

    /// Raw per-position means (position 1 first); `None` below the sample minimum.
    pub fn means(&self) -> &[Option<f64>] {
        &self.means
    }

    /// Calibration mean for a 1-based position.
    ///
    /// # Errors
    ///
    /// [`IndexError::InsufficientCalibrationData`] if the position had too
    /// few samples, [`IndexError::DegenerateDistribution`] if its mean is zero.
    pub fn mean_for(&self, position: u16) -> Result<f64, IndexError> {
        let idx = drought_calendar::CalendarPosition::new(position, self.periodicity)?.index();
        match self.means[idx] {
            None => Err(IndexError::InsufficientCalibrationData {
                position,
                n_samples: self.n_samples[idx],
                required: self.required,
            }),
            Some(m) if m == 0.0 => Err(IndexError::DegenerateDistribution {
                position,
                reason: "calibration mean is zero".to_string(),
            }),
            Some(m) => Ok(m),
        }
    }
}

/// Computes per-position calibration means.
///
/// # Errors
///
/// Returns validation errors for the configuration, inputs or window.
pub fn fit_normals(
    aggregated: &[f64],
    positions: &[u16],
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<PositionNormals, IndexError> {
    config.validate()?;
    crate::validate_series(aggregated, positions, config.periodicity())?;
    crate::validate_window(window, aggregated.len())?;

    let n_positions = usize::from(config.periodicity().n_positions());
    let mut sums = vec![0.0; n_positions];
    let mut counts = vec![0usize; n_positions];
    for i in window.range() {
        let v = aggregated[i];
        if !v.is_nan() {
            let idx = (positions[i] - 1) as usize;
            sums[idx] += v;
            counts[idx] += 1;
        }
    }

    let required = config.min_samples();
    let means = sums
        .iter()
        .zip(&counts)
        .map(|(&s, &n)| (n >= required).then_some(s / n as f64))
        .collect();

    Ok(PositionNormals {
        periodicity: config.periodicity(),
        window,
        means,
        n_samples: counts,
        required,
    })
}

/// Expresses every value as a percentage of its position's calibration mean.
///
/// Positions without a usable mean are missing in the output and reported
/// once each in [`IndexSeries::errors`].
///
/// # Errors
///
/// Returns validation errors for the configuration, inputs or window.
#[tracing::instrument(skip(aggregated, positions, config))]
pub fn percent_of_normal(
    aggregated: &[f64],
    positions: &[u16],
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<(IndexSeries, PositionNormals), IndexError> {
    let normals = fit_normals(aggregated, positions, window, config)?;

    let n_positions = usize::from(config.periodicity().n_positions());
    let mut used = vec![false; n_positions];
    for &p in positions {
        used[(p - 1) as usize] = true;
    }

    let mut errors = Vec::new();
    let means: Vec<Option<f64>> = (1..=n_positions as u16)
        .map(|position| match normals.mean_for(position) {
            Ok(m) => Some(m),
            Err(e) => {
                if used[(position - 1) as usize] {
                    warn!(position, error = %e, "position left missing");
                    errors.push(e);
                }
                None
            }
        })
        .collect();

    let values: Vec<f64> = aggregated
        .iter()
        .zip(positions)
        .map(|(&v, &p)| match means[(p - 1) as usize] {
            Some(m) => v / m * 100.0,
            None => f64::NAN,
        })
        .collect();

    debug!(n = values.len(), n_errors = errors.len(), "percent of normal");
    Ok((IndexSeries::new(values, errors), normals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn monthly(n_years: usize) -> Vec<u16> {
        (0..n_years * 12).map(|i| (i % 12 + 1) as u16).collect()
    }

    #[test]
    fn percent_relative_to_position_mean() {
        let positions = monthly(2);
        let mut values: Vec<f64> = (1..=12).map(|m| m as f64 * 10.0).collect();
        values.extend((1..=12).map(|m| m as f64 * 30.0));
        let config = IndexConfig::new().with_min_samples(2);
        let (out, normals) =
            percent_of_normal(&values, &positions, CalibrationWindow::full(24), &config).unwrap();
        assert!(out.errors().is_empty());
        // Month 1 mean = 20: 10 -> 50%, 30 -> 150%.
        assert_relative_eq!(normals.mean_for(1).unwrap(), 20.0);
        assert_relative_eq!(out.values()[0], 50.0);
        assert_relative_eq!(out.values()[12], 150.0);
    }

    #[test]
    fn insufficient_and_zero_mean_are_isolated() {
        let positions = monthly(3);
        let mut values = vec![10.0; 36];
        // Position 2 is always dry; position 3 has a single sample.
        for (v, &p) in values.iter_mut().zip(&positions) {
            if p == 2 {
                *v = 0.0;
            }
        }
        values[14] = f64::NAN;
        values[26] = f64::NAN;
        let config = IndexConfig::new().with_min_samples(2);
        let (out, _) =
            percent_of_normal(&values, &positions, CalibrationWindow::full(36), &config).unwrap();

        assert_eq!(out.errors().len(), 2);
        assert!(out.errors().iter().any(|e| matches!(
            e,
            IndexError::DegenerateDistribution { position: 2, .. }
        )));
        assert!(out.errors().iter().any(|e| matches!(
            e,
            IndexError::InsufficientCalibrationData {
                position: 3,
                n_samples: 1,
                required: 2,
            }
        )));
        assert!(out.values()[1].is_nan());
        assert!(out.values()[2].is_nan());
        assert_relative_eq!(out.values()[0], 100.0);
    }

    #[test]
    fn missing_value_is_missing() {
        let positions = monthly(2);
        let mut values = vec![5.0; 24];
        values[7] = f64::NAN;
        let config = IndexConfig::new().with_min_samples(1);
        let (out, _) =
            percent_of_normal(&values, &positions, CalibrationWindow::full(24), &config).unwrap();
        assert!(out.values()[7].is_nan());
        assert_relative_eq!(out.values()[19], 100.0);
    }
}
