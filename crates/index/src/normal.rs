//! Normal distribution parameters and the standard-normal inversion.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::IndexError;

/// Mean and standard deviation of a normal fit.
///
/// `sd == 0` is allowed and describes a point mass at `mean`, the fallback
/// for calibration samples without spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    mean: f64,
    sd: f64,
}

impl NormalParams {
    /// Returns `None` unless `mean` is finite and `sd` is finite and >= 0.
    pub fn new(mean: f64, sd: f64) -> Option<Self> {
        if mean.is_finite() && sd.is_finite() && sd >= 0.0 {
            Some(Self { mean, sd })
        } else {
            None
        }
    }

    /// Mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation.
    pub fn sd(&self) -> f64 {
        self.sd
    }

    /// Returns `true` if the fit is a point mass.
    pub fn is_point_mass(&self) -> bool {
        self.sd == 0.0
    }
}

/// Normal CDF, or the point-mass step when the spread is zero.
#[derive(Debug, Clone)]
pub(crate) enum NormalCdf {
    Continuous(Normal),
    PointMass(f64),
}

impl NormalCdf {
    pub(crate) fn new(params: &NormalParams, position: u16) -> Result<Self, IndexError> {
        if params.is_point_mass() {
            return Ok(Self::PointMass(params.mean()));
        }
        Normal::new(params.mean(), params.sd())
            .map(Self::Continuous)
            .map_err(|e| IndexError::DistributionConstruction {
                family: "normal",
                position,
                message: e.to_string(),
            })
    }

    pub(crate) fn cdf(&self, x: f64) -> f64 {
        match self {
            Self::Continuous(dist) => dist.cdf(x),
            Self::PointMass(at) => {
                if x < *at {
                    0.0
                } else if x > *at {
                    1.0
                } else {
                    0.5
                }
            }
        }
    }
}

/// Maps a cumulative probability to a standard-normal deviate clamped to
/// `[-bound, bound]`.
///
/// Saturated probabilities (0 or 1) map straight to the bounds; every other
/// probability is inverted and then clamped.
#[derive(Debug, Clone)]
pub(crate) struct ProbabilityToIndex {
    standard: Normal,
    bound: f64,
}

impl ProbabilityToIndex {
    pub(crate) fn new(bound: f64) -> Self {
        Self {
            // Unit normal parameters are always valid.
            standard: Normal::standard(),
            bound,
        }
    }

    pub(crate) fn apply(&self, p: f64) -> f64 {
        if p.is_nan() {
            return f64::NAN;
        }
        if p <= 0.0 {
            return -self.bound;
        }
        if p >= 1.0 {
            return self.bound;
        }
        self.standard.inverse_cdf(p).clamp(-self.bound, self.bound)
    }
}
