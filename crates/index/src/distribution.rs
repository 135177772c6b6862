//! Per-position fitted distributions and their prepared CDFs.

use std::fmt;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Gamma};

use crate::config::DistributionFamily;
use crate::error::IndexError;
use crate::gamma::{GammaParams, gamma_dist};
use crate::normal::{NormalCdf, NormalParams};
use crate::pearson::{PearsonCdf, PearsonParams};

/// Gamma fit on the positive part of a sample plus its empirical zero mass.
///
/// `params` is `None` when every calibration value at the position was
/// zero; the zero fraction is then 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaFit {
    params: Option<GammaParams>,
    zero_fraction: f64,
}

impl GammaFit {
    pub(crate) fn new(params: Option<GammaParams>, zero_fraction: f64) -> Self {
        Self {
            params,
            zero_fraction,
        }
    }

    /// Continuous part of the fit, absent for all-zero samples.
    pub fn params(&self) -> Option<GammaParams> {
        self.params
    }

    /// Shape parameter, if a continuous part was fitted.
    pub fn shape(&self) -> Option<f64> {
        self.params.map(|p| p.shape())
    }

    /// Scale parameter, if a continuous part was fitted.
    pub fn scale(&self) -> Option<f64> {
        self.params.map(|p| p.scale())
    }

    /// Fraction of calibration values at or below the zero threshold.
    pub fn zero_fraction(&self) -> f64 {
        self.zero_fraction
    }
}

/// Distribution fitted to one calendar position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittedDistribution {
    /// Mixed zero-mass and gamma distribution.
    Gamma(GammaFit),
    /// Pearson Type III.
    PearsonIii(PearsonParams),
    /// Normal.
    Normal(NormalParams),
}

impl FittedDistribution {
    /// Family this fit belongs to.
    pub fn family(&self) -> DistributionFamily {
        match self {
            FittedDistribution::Gamma(_) => DistributionFamily::Gamma,
            FittedDistribution::PearsonIii(_) => DistributionFamily::PearsonIii,
            FittedDistribution::Normal(_) => DistributionFamily::Normal,
        }
    }

    /// Builds the statrs-backed CDF for this fit.
    pub(crate) fn prepare(
        &self,
        position: u16,
        zero_threshold: f64,
    ) -> Result<PreparedCdf, IndexError> {
        match self {
            FittedDistribution::Gamma(fit) => {
                let continuous = fit
                    .params()
                    .map(|p| gamma_dist(&p, position))
                    .transpose()?;
                Ok(PreparedCdf::Gamma {
                    continuous,
                    zero_fraction: fit.zero_fraction(),
                    zero_threshold,
                })
            }
            FittedDistribution::PearsonIii(p) => PearsonCdf::new(p, position).map(PreparedCdf::Pearson),
            FittedDistribution::Normal(p) => NormalCdf::new(p, position).map(PreparedCdf::Normal),
        }
    }
}

/// Why a calendar position has no fitted distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfittableReason {
    /// Fewer usable calibration samples than required.
    InsufficientSamples {
        /// Usable samples found.
        n_samples: usize,
        /// Configured minimum.
        required: usize,
    },
    /// The sample cannot support the family (e.g. constant positive values
    /// for gamma).
    Degenerate {
        /// Description of the problem.
        reason: String,
    },
}

impl UnfittableReason {
    /// Converts the reason into the error reported for `position`.
    pub fn to_error(&self, position: u16) -> IndexError {
        match self {
            UnfittableReason::InsufficientSamples {
                n_samples,
                required,
            } => IndexError::InsufficientCalibrationData {
                position,
                n_samples: *n_samples,
                required: *required,
            },
            UnfittableReason::Degenerate { reason } => IndexError::DegenerateDistribution {
                position,
                reason: reason.clone(),
            },
        }
    }
}

/// Fit outcome for one calendar position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionFit {
    /// A distribution was fitted.
    Fitted(FittedDistribution),
    /// No distribution could be fitted.
    Unfittable(UnfittableReason),
}

impl PositionFit {
    /// Returns the fitted distribution, if any.
    pub fn fitted(&self) -> Option<&FittedDistribution> {
        match self {
            PositionFit::Fitted(d) => Some(d),
            PositionFit::Unfittable(_) => None,
        }
    }
}

/// Non-fatal fitting condition recorded alongside a usable fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    /// Skewness is close enough to zero that the normal CDF is used.
    NearZeroSkew,
    /// The sample has no spread; a point-mass CDF is used.
    ZeroVariance,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::NearZeroSkew => f.write_str("near-zero skew, normal CDF used"),
            QualityIssue::ZeroVariance => f.write_str("zero variance, point-mass CDF used"),
        }
    }
}

/// A quality issue at a calendar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFlag {
    /// 1-based calendar position.
    pub position: u16,
    /// What was observed.
    pub issue: QualityIssue,
}

impl QualityFlag {
    /// The equivalent [`IndexError::DegenerateDistribution`], for zero-variance flags.
    pub fn as_degenerate(&self) -> Option<IndexError> {
        match self.issue {
            QualityIssue::ZeroVariance => Some(IndexError::DegenerateDistribution {
                position: self.position,
                reason: self.issue.to_string(),
            }),
            QualityIssue::NearZeroSkew => None,
        }
    }
}

/// CDF ready for repeated evaluation.
#[derive(Debug, Clone)]
pub(crate) enum PreparedCdf {
    Gamma {
        continuous: Option<Gamma>,
        zero_fraction: f64,
        zero_threshold: f64,
    },
    Pearson(PearsonCdf),
    Normal(NormalCdf),
}

impl PreparedCdf {
    /// Cumulative probability of `x`; NaN for missing input.
    pub(crate) fn probability(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        match self {
            PreparedCdf::Gamma {
                continuous,
                zero_fraction,
                zero_threshold,
            } => match continuous {
                // Zeros never reach the continuous CDF.
                Some(_) if x <= *zero_threshold => *zero_fraction,
                Some(dist) => zero_fraction + (1.0 - zero_fraction) * dist.cdf(x),
                // All-zero calibration: zeros sit at the bottom of the scale.
                None if x <= *zero_threshold => 0.0,
                None => 1.0,
            },
            PreparedCdf::Pearson(cdf) => cdf.cdf(x),
            PreparedCdf::Normal(cdf) => cdf.cdf(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gamma_fit(q: f64) -> FittedDistribution {
        FittedDistribution::Gamma(GammaFit::new(GammaParams::new(2.0, 10.0), q))
    }

    #[test]
    fn gamma_zero_maps_to_zero_fraction() {
        let cdf = gamma_fit(0.25).prepare(3, 0.0).unwrap();
        assert_relative_eq!(cdf.probability(0.0), 0.25);
    }

    #[test]
    fn gamma_mixed_cdf() {
        let cdf = gamma_fit(0.25).prepare(3, 0.0).unwrap();
        let g = gamma_dist(&GammaParams::new(2.0, 10.0).unwrap(), 3)
            .unwrap()
            .cdf(20.0);
        assert_relative_eq!(cdf.probability(20.0), 0.25 + 0.75 * g, epsilon = 1e-15);
    }

    #[test]
    fn zero_threshold_counts_small_values_as_zero() {
        let cdf = gamma_fit(0.4).prepare(1, 0.5).unwrap();
        assert_relative_eq!(cdf.probability(0.3), 0.4);
        assert!(cdf.probability(0.6) > 0.4);
    }

    #[test]
    fn all_zero_calibration() {
        let fit = FittedDistribution::Gamma(GammaFit::new(None, 1.0));
        let cdf = fit.prepare(7, 0.0).unwrap();
        assert_eq!(cdf.probability(0.0), 0.0);
        assert_eq!(cdf.probability(5.0), 1.0);
    }

    #[test]
    fn missing_is_nan() {
        let cdf = gamma_fit(0.1).prepare(1, 0.0).unwrap();
        assert!(cdf.probability(f64::NAN).is_nan());
    }

    #[test]
    fn family_of_fit() {
        assert_eq!(gamma_fit(0.0).family(), DistributionFamily::Gamma);
        let n = FittedDistribution::Normal(NormalParams::new(0.0, 1.0).unwrap());
        assert_eq!(n.family(), DistributionFamily::Normal);
    }

    #[test]
    fn unfittable_reason_to_error() {
        let r = UnfittableReason::InsufficientSamples {
            n_samples: 2,
            required: 10,
        };
        assert_eq!(
            r.to_error(4),
            IndexError::InsufficientCalibrationData {
                position: 4,
                n_samples: 2,
                required: 10,
            }
        );
    }

    #[test]
    fn zero_variance_flag_is_degenerate() {
        let flag = QualityFlag {
            position: 2,
            issue: QualityIssue::ZeroVariance,
        };
        assert!(matches!(
            flag.as_degenerate(),
            Some(IndexError::DegenerateDistribution { position: 2, .. })
        ));
        let skew = QualityFlag {
            position: 2,
            issue: QualityIssue::NearZeroSkew,
        };
        assert!(skew.as_degenerate().is_none());
    }
}
