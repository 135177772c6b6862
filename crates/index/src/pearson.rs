//! Pearson Type III distribution fitted by the method of moments.
//!
//! The three-parameter form is expressed through a standard gamma with
//! shape `α = 4 / g²`, shifted to the origin `ξ = μ - 2σ/g` and scaled by
//! `β = σg/2`. Negative skew mirrors the distribution, so the CDF becomes
//! `1 - G_α(z)`.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Gamma};

use crate::error::IndexError;
use crate::normal::{NormalCdf, NormalParams};

/// Skewness magnitude below which the normal CDF is used instead of the
/// incomplete gamma.
pub(crate) const NEAR_ZERO_SKEW: f64 = 1e-3;

/// Relative spread below which a sample is treated as constant.
pub(crate) const MIN_RELATIVE_SD: f64 = 1e-10;

/// Moment parameters of a Pearson Type III fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PearsonParams {
    skew: f64,
    scale: f64,
    location: f64,
}

impl PearsonParams {
    /// Creates parameters from skewness, standard deviation and mean.
    ///
    /// Returns `None` unless all three are finite and `scale >= 0`.
    pub fn new(skew: f64, scale: f64, location: f64) -> Option<Self> {
        if skew.is_finite() && scale.is_finite() && scale >= 0.0 && location.is_finite() {
            Some(Self {
                skew,
                scale,
                location,
            })
        } else {
            None
        }
    }

    /// Method-of-moments estimate from a calibration sample (zeros included).
    ///
    /// A sample without spread yields `skew = 0` and `scale = 0`. Returns
    /// `None` for fewer than two values.
    pub fn from_moments(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let location = drought_stats::mean(values);
        let scale = drought_stats::sd(values);
        if is_negligible_spread(scale, location) {
            return Self::new(0.0, 0.0, location);
        }
        let skew = drought_stats::skewness(values).unwrap_or(0.0);
        Self::new(skew, scale, location)
    }

    /// Skewness coefficient (g).
    pub fn skew(&self) -> f64 {
        self.skew
    }

    /// Standard deviation (σ).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Mean (μ).
    pub fn location(&self) -> f64 {
        self.location
    }

    /// Returns `true` if the sample had no usable spread.
    pub fn is_degenerate(&self) -> bool {
        is_negligible_spread(self.scale, self.location)
    }

    /// Returns `true` if the skew is small enough that the normal CDF is used.
    pub fn is_near_normal(&self) -> bool {
        self.skew.abs() < NEAR_ZERO_SKEW
    }
}

pub(crate) fn is_negligible_spread(sd: f64, mean: f64) -> bool {
    sd <= MIN_RELATIVE_SD * mean.abs().max(1.0)
}

/// Prepared Pearson III CDF.
#[derive(Debug, Clone)]
pub(crate) enum PearsonCdf {
    Skewed {
        gamma: Gamma,
        origin: f64,
        beta: f64,
        positive: bool,
    },
    Symmetric(NormalCdf),
}

impl PearsonCdf {
    pub(crate) fn new(params: &PearsonParams, position: u16) -> Result<Self, IndexError> {
        if params.is_degenerate() {
            let point = NormalParams::new(params.location(), 0.0).ok_or_else(|| {
                IndexError::DistributionConstruction {
                    family: "pearson3",
                    position,
                    message: format!("non-finite location {}", params.location()),
                }
            })?;
            return NormalCdf::new(&point, position).map(Self::Symmetric);
        }
        if params.is_near_normal() {
            let normal = NormalParams::new(params.location(), params.scale()).ok_or_else(|| {
                IndexError::DistributionConstruction {
                    family: "pearson3",
                    position,
                    message: format!("invalid normal parameters {params:?}"),
                }
            })?;
            return NormalCdf::new(&normal, position).map(Self::Symmetric);
        }

        let g = params.skew();
        let alpha = 4.0 / (g * g);
        let beta = params.scale() * g / 2.0;
        let origin = params.location() - 2.0 * params.scale() / g;
        let gamma = Gamma::new(alpha, 1.0).map_err(|e| IndexError::DistributionConstruction {
            family: "pearson3",
            position,
            message: e.to_string(),
        })?;
        Ok(Self::Skewed {
            gamma,
            origin,
            beta,
            positive: g > 0.0,
        })
    }

    pub(crate) fn cdf(&self, x: f64) -> f64 {
        match self {
            Self::Symmetric(normal) => normal.cdf(x),
            Self::Skewed {
                gamma,
                origin,
                beta,
                positive,
            } => {
                let z = (x - origin) / beta;
                match (*positive, z > 0.0) {
                    (true, true) => gamma.cdf(z),
                    (true, false) => 0.0,
                    (false, true) => 1.0 - gamma.cdf(z),
                    (false, false) => 1.0,
                }
            }
        }
    }
}
