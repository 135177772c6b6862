//! Maps aggregated values to standardized index values through the fitted
//! per-position distributions.

use tracing::{debug, warn};

use crate::config::IndexConfig;
use crate::distribution::{PositionFit, PreparedCdf};
use crate::error::IndexError;
use crate::fit::ParameterSet;
use crate::normal::ProbabilityToIndex;
use crate::result::IndexSeries;

fn check_periodicity(params: &ParameterSet, config: &IndexConfig) -> Result<(), IndexError> {
    if params.periodicity() != config.periodicity() {
        return Err(IndexError::InvalidConfig {
            reason: format!(
                "parameters fitted for {} series, configuration is {}",
                params.periodicity(),
                config.periodicity()
            ),
        });
    }
    Ok(())
}

/// Standardizes a full series.
///
/// Every value uses only its own position's parameters, including values
/// outside the calibration window. Values at positions without a usable
/// fit are missing in the output, and each such position is reported once
/// in [`IndexSeries::errors`].
///
/// # Errors
///
/// Returns an error for an invalid configuration, a periodicity that does
/// not match `params`, mismatched slice lengths or out-of-range positions.
pub fn standardize(
    aggregated: &[f64],
    positions: &[u16],
    params: &ParameterSet,
    config: &IndexConfig,
) -> Result<IndexSeries, IndexError> {
    config.validate()?;
    check_periodicity(params, config)?;
    crate::validate_series(aggregated, positions, params.periodicity())?;

    let n_positions = usize::from(params.periodicity().n_positions());
    let mut used = vec![false; n_positions];
    for &p in positions {
        used[(p - 1) as usize] = true;
    }

    let mut errors = Vec::new();
    let mut cdfs: Vec<Option<PreparedCdf>> = Vec::with_capacity(n_positions);
    for (i, fit) in params.positions().iter().enumerate() {
        let position = (i + 1) as u16;
        let prepared = match fit {
            PositionFit::Fitted(dist) => dist.prepare(position, config.zero_threshold()),
            PositionFit::Unfittable(reason) => Err(reason.to_error(position)),
        };
        match prepared {
            Ok(cdf) => cdfs.push(Some(cdf)),
            Err(e) => {
                if used[i] {
                    warn!(position, error = %e, "position left missing");
                    errors.push(e);
                }
                cdfs.push(None);
            }
        }
    }

    let to_index = ProbabilityToIndex::new(config.clamp_bound());
    let values: Vec<f64> = aggregated
        .iter()
        .zip(positions)
        .map(|(&v, &p)| match &cdfs[(p - 1) as usize] {
            Some(cdf) => to_index.apply(cdf.probability(v)),
            None => f64::NAN,
        })
        .collect();

    debug!(
        n = values.len(),
        n_errors = errors.len(),
        "standardized series"
    );
    Ok(IndexSeries::new(values, errors))
}

/// Standardizes a single value at a calendar position.
///
/// Missing input yields a missing (NaN) result.
///
/// # Errors
///
/// Returns [`IndexError::InsufficientCalibrationData`] or
/// [`IndexError::DegenerateDistribution`] if the position has no fit, and
/// validation errors as for [`standardize`].
pub fn standardize_value(
    value: f64,
    position: u16,
    params: &ParameterSet,
    config: &IndexConfig,
) -> Result<f64, IndexError> {
    config.validate()?;
    check_periodicity(params, config)?;
    let cdf = params
        .fit_for(position)?
        .prepare(position, config.zero_threshold())?;
    Ok(ProbabilityToIndex::new(config.clamp_bound()).apply(cdf.probability(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::count_valid;
    use crate::config::DistributionFamily;
    use crate::fit::fit_parameters;
    use approx::assert_relative_eq;
    use drought_calendar::{CalibrationWindow, Periodicity};
    use rand::SeedableRng;
    use rand_distr::{Distribution, Gamma as GammaDist};

    fn monthly(n_years: usize) -> Vec<u16> {
        (0..n_years * 12).map(|i| (i % 12 + 1) as u16).collect()
    }

    fn synthetic(seed: u64, n_years: usize) -> (Vec<f64>, Vec<u16>) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let dist = GammaDist::new(2.0, 40.0).unwrap();
        let positions = monthly(n_years);
        let values = positions.iter().map(|_| dist.sample(&mut rng)).collect();
        (values, positions)
    }

    #[test]
    fn outputs_are_finite_and_bounded() {
        let (values, positions) = synthetic(11, 30);
        for family in [
            DistributionFamily::Gamma,
            DistributionFamily::PearsonIii,
            DistributionFamily::Normal,
        ] {
            let config = IndexConfig::new().with_distribution(family);
            let params =
                fit_parameters(&values, &positions, CalibrationWindow::full(values.len()), &config)
                    .unwrap();
            let out = standardize(&values, &positions, &params, &config).unwrap();
            assert!(out.errors().is_empty());
            for &z in out.values() {
                assert!(z.is_finite());
                assert!((-3.09..=3.09).contains(&z));
            }
        }
    }

    #[test]
    fn median_maps_near_zero() {
        let (values, positions) = synthetic(5, 40);
        let config = IndexConfig::new();
        let params =
            fit_parameters(&values, &positions, CalibrationWindow::full(values.len()), &config)
                .unwrap();
        let out = standardize(&values, &positions, &params, &config).unwrap();
        let mean = drought_stats::mean(out.values());
        assert_relative_eq!(mean, 0.0, epsilon = 0.15);
    }

    #[test]
    fn missing_stays_missing() {
        let (mut values, positions) = synthetic(1, 20);
        values[30] = f64::NAN;
        let config = IndexConfig::new();
        let params =
            fit_parameters(&values, &positions, CalibrationWindow::full(values.len()), &config)
                .unwrap();
        let out = standardize(&values, &positions, &params, &config).unwrap();
        assert!(out.values()[30].is_nan());
        assert_eq!(count_valid(out.values()), values.len() - 1);
    }

    #[test]
    fn unfittable_position_is_isolated() {
        let (mut values, positions) = synthetic(9, 20);
        // Position 4 loses most of its calibration data.
        for (v, &p) in values.iter_mut().zip(&positions).skip(24) {
            if p == 4 {
                *v = f64::NAN;
            }
        }
        let config = IndexConfig::new();
        let params =
            fit_parameters(&values, &positions, CalibrationWindow::full(values.len()), &config)
                .unwrap();
        let out = standardize(&values, &positions, &params, &config).unwrap();
        assert_eq!(out.errors().len(), 1);
        assert!(matches!(
            out.errors()[0],
            IndexError::InsufficientCalibrationData { position: 4, .. }
        ));
        assert!(out.values()[3].is_nan());
        assert!(out.values()[4].is_finite());
    }

    #[test]
    fn single_value_matches_series() {
        let (values, positions) = synthetic(21, 25);
        let config = IndexConfig::new();
        let params =
            fit_parameters(&values, &positions, CalibrationWindow::full(values.len()), &config)
                .unwrap();
        let out = standardize(&values, &positions, &params, &config).unwrap();
        for i in [0, 13, 77, 200] {
            let z = standardize_value(values[i], positions[i], &params, &config).unwrap();
            assert_eq!(z, out.values()[i]);
        }
    }

    #[test]
    fn single_value_reports_unfittable() {
        let values = vec![5.0; 24];
        let positions = monthly(2);
        let config = IndexConfig::new();
        let params = fit_parameters(&values, &positions, CalibrationWindow::full(24), &config)
            .unwrap();
        assert!(matches!(
            standardize_value(5.0, 2, &params, &config),
            Err(IndexError::InsufficientCalibrationData { position: 2, .. })
        ));
    }

    #[test]
    fn periodicity_mismatch_is_rejected() {
        let (values, positions) = synthetic(2, 15);
        let config = IndexConfig::new();
        let params =
            fit_parameters(&values, &positions, CalibrationWindow::full(values.len()), &config)
                .unwrap();
        let daily = config.clone().with_periodicity(Periodicity::Daily);
        assert!(matches!(
            standardize(&values, &positions, &params, &daily),
            Err(IndexError::InvalidConfig { .. })
        ));
    }
}
