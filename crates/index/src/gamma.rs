//! Gamma distribution parameters, Thom's estimator and the statrs bridge.

use serde::{Deserialize, Serialize};
use statrs::distribution::Gamma;

use crate::error::IndexError;

/// Below this value of `ln(mean) - mean(ln x)` the sample has no usable
/// spread and the shape estimate diverges.
const MIN_LOG_SPREAD: f64 = 1e-10;

/// Validated parameters for a Gamma distribution (shape/scale convention).
///
/// Both `shape` (α) and `scale` (β) must be finite and positive.
/// Use [`GammaParams::new`] for direct construction or
/// [`GammaParams::from_thom`] for maximum-likelihood estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaParams {
    shape: f64,
    scale: f64,
}

impl GammaParams {
    /// Create new gamma parameters after validating that both `shape` and
    /// `scale` are finite and strictly positive.
    pub fn new(shape: f64, scale: f64) -> Option<Self> {
        if shape.is_finite() && shape > 0.0 && scale.is_finite() && scale > 0.0 {
            Some(Self { shape, scale })
        } else {
            None
        }
    }

    /// Estimate gamma parameters from strictly positive values with Thom's
    /// (1958) approximation to the maximum-likelihood solution:
    ///
    /// - A = ln(mean) − mean(ln x)
    /// - shape = (1 + √(1 + 4A/3)) / (4A)
    /// - scale = mean / shape
    ///
    /// Returns `None` for empty input, non-positive values, or a sample
    /// whose values are all (numerically) equal.
    pub fn from_thom(values: &[f64]) -> Option<Self> {
        let mean_ln = drought_stats::mean_ln(values)?;
        let mean = drought_stats::mean(values);
        let a = mean.ln() - mean_ln;
        if !a.is_finite() || a < MIN_LOG_SPREAD {
            return None;
        }
        let shape = (1.0 + (1.0 + 4.0 * a / 3.0).sqrt()) / (4.0 * a);
        Self::new(shape, mean / shape)
    }

    /// Shape parameter (α).
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale parameter (β).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Distribution mean (shape * scale).
    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }

    /// Rate parameter (1 / scale), used by statrs which parameterises Gamma
    /// by (shape, rate) rather than (shape, scale).
    pub(crate) fn rate(&self) -> f64 {
        1.0 / self.scale
    }
}

/// Build a [`statrs::distribution::Gamma`] from [`GammaParams`].
///
/// Note: `statrs::distribution::Gamma::new` takes `(shape, rate)` where
/// `rate = 1 / scale`.
pub(crate) fn gamma_dist(params: &GammaParams, position: u16) -> Result<Gamma, IndexError> {
    Gamma::new(params.shape(), params.rate()).map_err(|e| IndexError::DistributionConstruction {
        family: "gamma",
        position,
        message: e.to_string(),
    })
}
