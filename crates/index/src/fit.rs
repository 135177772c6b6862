//! Per-position distribution fitting over a calibration window.

use drought_calendar::{CalibrationWindow, Periodicity};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{DistributionFamily, IndexConfig};
use crate::distribution::{
    FittedDistribution, GammaFit, PositionFit, QualityFlag, QualityIssue, UnfittableReason,
};
use crate::error::IndexError;
use crate::gamma::GammaParams;
use crate::normal::NormalParams;
use crate::pearson::{PearsonParams, is_negligible_spread};

/// Fitted parameters for every calendar position of a periodicity.
///
/// Built once by [`fit_parameters`] and read-only afterwards. Entry `k - 1`
/// holds the fit for position `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    periodicity: Periodicity,
    family: DistributionFamily,
    window: CalibrationWindow,
    positions: Vec<PositionFit>,
    quality_flags: Vec<QualityFlag>,
}

impl ParameterSet {
    /// Assembles a parameter set from previously fitted parts.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if the number of entries does
    /// not match the periodicity or a fitted entry belongs to another family.
    pub fn from_parts(
        periodicity: Periodicity,
        family: DistributionFamily,
        window: CalibrationWindow,
        positions: Vec<PositionFit>,
        quality_flags: Vec<QualityFlag>,
    ) -> Result<Self, IndexError> {
        if positions.len() != usize::from(periodicity.n_positions()) {
            return Err(IndexError::InvalidConfig {
                reason: format!(
                    "{} positions supplied for {periodicity} periodicity ({} expected)",
                    positions.len(),
                    periodicity.n_positions()
                ),
            });
        }
        if let Some(other) = positions
            .iter()
            .filter_map(PositionFit::fitted)
            .find(|d| d.family() != family)
        {
            return Err(IndexError::InvalidConfig {
                reason: format!("{} fit in a {family} parameter set", other.family()),
            });
        }
        Ok(Self {
            periodicity,
            family,
            window,
            positions,
            quality_flags,
        })
    }

    /// Periodicity the set was fitted for.
    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Distribution family used at every position.
    pub fn family(&self) -> DistributionFamily {
        self.family
    }

    /// Calibration window the parameters were estimated on.
    pub fn window(&self) -> CalibrationWindow {
        self.window
    }

    /// All per-position outcomes, position 1 first.
    pub fn positions(&self) -> &[PositionFit] {
        &self.positions
    }

    /// Quality flags raised while fitting.
    pub fn quality_flags(&self) -> &[QualityFlag] {
        &self.quality_flags
    }

    /// Outcome for a 1-based calendar position.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Calendar`] if `position` is outside the periodicity.
    pub fn get(&self, position: u16) -> Result<&PositionFit, IndexError> {
        let pos = drought_calendar::CalendarPosition::new(position, self.periodicity)?;
        Ok(&self.positions[pos.index()])
    }

    /// Fitted distribution for a position, or the error explaining its absence.
    pub fn fit_for(&self, position: u16) -> Result<&FittedDistribution, IndexError> {
        match self.get(position)? {
            PositionFit::Fitted(d) => Ok(d),
            PositionFit::Unfittable(reason) => Err(reason.to_error(position)),
        }
    }

    /// 1-based positions with a fitted distribution.
    pub fn fitted_positions(&self) -> Vec<u16> {
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.fitted().is_some())
            .map(|(i, _)| (i + 1) as u16)
            .collect()
    }

    /// Unfittable positions with the error each one reports.
    pub fn unfittable_positions(&self) -> Vec<(u16, IndexError)> {
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(i, p)| match p {
                PositionFit::Unfittable(reason) => {
                    let position = (i + 1) as u16;
                    Some((position, reason.to_error(position)))
                }
                PositionFit::Fitted(_) => None,
            })
            .collect()
    }
}

/// Groups the non-missing in-window values by calendar position.
fn calibration_samples(
    aggregated: &[f64],
    positions: &[u16],
    window: CalibrationWindow,
    n_positions: usize,
) -> Vec<Vec<f64>> {
    let mut samples = vec![Vec::new(); n_positions];
    for i in window.range() {
        let v = aggregated[i];
        if !v.is_nan() {
            samples[(positions[i] - 1) as usize].push(v);
        }
    }
    samples
}

/// Gamma fit with an empirical zero mass.
pub(crate) fn fit_gamma_thom(sample: &[f64], config: &IndexConfig) -> PositionFit {
    let required = config.min_samples();
    if sample.len() < required {
        return PositionFit::Unfittable(UnfittableReason::InsufficientSamples {
            n_samples: sample.len(),
            required,
        });
    }

    let positive: Vec<f64> = sample
        .iter()
        .copied()
        .filter(|&v| v > config.zero_threshold())
        .collect();
    let zero_fraction = (sample.len() - positive.len()) as f64 / sample.len() as f64;

    if positive.is_empty() {
        return PositionFit::Fitted(FittedDistribution::Gamma(GammaFit::new(None, 1.0)));
    }
    if positive.len() < required {
        return PositionFit::Unfittable(UnfittableReason::InsufficientSamples {
            n_samples: positive.len(),
            required,
        });
    }

    match GammaParams::from_thom(&positive) {
        Some(params) => {
            PositionFit::Fitted(FittedDistribution::Gamma(GammaFit::new(Some(params), zero_fraction)))
        }
        None => PositionFit::Unfittable(UnfittableReason::Degenerate {
            reason: "positive values have no spread".to_string(),
        }),
    }
}

fn fit_pearson(sample: &[f64], config: &IndexConfig) -> (PositionFit, Option<QualityIssue>) {
    let required = config.min_samples().max(3);
    let params = match PearsonParams::from_moments(sample) {
        Some(p) if sample.len() >= required => p,
        _ => {
            return (
                PositionFit::Unfittable(UnfittableReason::InsufficientSamples {
                    n_samples: sample.len(),
                    required,
                }),
                None,
            );
        }
    };
    let issue = if params.is_degenerate() {
        Some(QualityIssue::ZeroVariance)
    } else if params.is_near_normal() {
        Some(QualityIssue::NearZeroSkew)
    } else {
        None
    };
    (PositionFit::Fitted(FittedDistribution::PearsonIii(params)), issue)
}

fn fit_normal(sample: &[f64], config: &IndexConfig) -> (PositionFit, Option<QualityIssue>) {
    let required = config.min_samples().max(2);
    if sample.len() < required {
        return (
            PositionFit::Unfittable(UnfittableReason::InsufficientSamples {
                n_samples: sample.len(),
                required,
            }),
            None,
        );
    }
    let mean = drought_stats::mean(sample);
    let sd = drought_stats::sd(sample);
    let (sd, issue) = if is_negligible_spread(sd, mean) {
        (0.0, Some(QualityIssue::ZeroVariance))
    } else {
        (sd, None)
    };
    match NormalParams::new(mean, sd) {
        Some(p) => (PositionFit::Fitted(FittedDistribution::Normal(p)), issue),
        None => (
            PositionFit::Unfittable(UnfittableReason::Degenerate {
                reason: format!("non-finite moments (mean {mean}, sd {sd})"),
            }),
            None,
        ),
    }
}

/// Marks gamma fits whose shifted water balance reaches the zero mass.
///
/// A shifted balance at or below the zero threshold is a deficit larger
/// than the offset, not a dry period, so the fit at that position is
/// replaced with [`UnfittableReason::Degenerate`]. Positions that were
/// already unfittable keep their original reason.
pub(crate) fn reject_shifted_deficits(
    set: &mut ParameterSet,
    shifted: &[f64],
    positions: &[u16],
    offset: f64,
    zero_threshold: f64,
) {
    let samples = calibration_samples(shifted, positions, set.window, set.positions.len());
    for (i, sample) in samples.iter().enumerate() {
        let lowest = sample.iter().copied().fold(f64::INFINITY, f64::min);
        if lowest > zero_threshold || set.positions[i].fitted().is_none() {
            continue;
        }
        let position = (i + 1) as u16;
        let deficit = offset - lowest;
        warn!(position, deficit, offset, "water balance deficit exceeds offset");
        set.positions[i] = PositionFit::Unfittable(UnfittableReason::Degenerate {
            reason: format!(
                "water balance deficit {deficit} reaches the offset {offset}; \
                 raise water_balance_offset"
            ),
        });
    }
}

/// Fits one distribution per calendar position over the calibration window.
///
/// Missing values are skipped. Positions that cannot be fitted are recorded
/// as [`PositionFit::Unfittable`] rather than failing the whole set.
///
/// # Errors
///
/// Returns an error for an invalid configuration, mismatched slice lengths,
/// out-of-range positions, or a window that does not fit inside the series.
#[tracing::instrument(skip(aggregated, positions, config), fields(family = %config.distribution()))]
pub fn fit_parameters(
    aggregated: &[f64],
    positions: &[u16],
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<ParameterSet, IndexError> {
    config.validate()?;
    crate::validate_series(aggregated, positions, config.periodicity())?;
    crate::validate_window(window, aggregated.len())?;

    let n_positions = usize::from(config.periodicity().n_positions());
    let samples = calibration_samples(aggregated, positions, window, n_positions);

    let mut fits = Vec::with_capacity(n_positions);
    let mut quality_flags = Vec::new();
    for (i, sample) in samples.iter().enumerate() {
        let position = (i + 1) as u16;
        let (fit, issue) = match config.distribution() {
            DistributionFamily::Gamma => (fit_gamma_thom(sample, config), None),
            DistributionFamily::PearsonIii => fit_pearson(sample, config),
            DistributionFamily::Normal => fit_normal(sample, config),
        };
        if let Some(issue) = issue {
            debug!(position, %issue, "quality flag");
            quality_flags.push(QualityFlag { position, issue });
        }
        if let PositionFit::Unfittable(reason) = &fit {
            debug!(position, ?reason, "position not fitted");
        }
        fits.push(fit);
    }

    let set = ParameterSet {
        periodicity: config.periodicity(),
        family: config.distribution(),
        window,
        positions: fits,
        quality_flags,
    };
    debug!(
        fitted = set.fitted_positions().len(),
        n_positions, "fitted parameter set"
    );
    Ok(set)
}
