//! Configuration for index computation.

use std::fmt;
use std::str::FromStr;

use drought_calendar::Periodicity;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Parametric family fitted per calendar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionFamily {
    /// Two-parameter gamma on positive values plus an empirical zero mass.
    #[default]
    Gamma,
    /// Pearson Type III fitted by the method of moments.
    PearsonIii,
    /// Normal distribution; the zero-skew reference for Pearson III.
    Normal,
}

impl DistributionFamily {
    /// Lower-case name used in configuration files and error messages.
    pub fn name(self) -> &'static str {
        match self {
            DistributionFamily::Gamma => "gamma",
            DistributionFamily::PearsonIii => "pearson3",
            DistributionFamily::Normal => "normal",
        }
    }
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionFamily {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gamma" => Ok(DistributionFamily::Gamma),
            "pearson3" | "pearson" | "pearson_iii" => Ok(DistributionFamily::PearsonIii),
            "normal" => Ok(DistributionFamily::Normal),
            other => Err(IndexError::InvalidConfig {
                reason: format!("unknown distribution family: {other:?}"),
            }),
        }
    }
}

/// Configuration for aggregation, fitting and standardization.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use drought_index::{DistributionFamily, IndexConfig};
///
/// let config = IndexConfig::new()
///     .with_distribution(DistributionFamily::PearsonIii)
///     .with_min_samples(20);
/// ```
#[derive(Clone, Debug)]
pub struct IndexConfig {
    periodicity: Periodicity,
    distribution: DistributionFamily,
    min_samples: usize,
    clamp_bound: f64,
    zero_threshold: f64,
    water_balance_offset: f64,
}

impl IndexConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `periodicity = Monthly`, `distribution = Gamma`,
    /// `min_samples = 10`, `clamp_bound = 3.09`, `zero_threshold = 0.0`,
    /// `water_balance_offset = 1000.0`.
    pub fn new() -> Self {
        Self {
            periodicity: Periodicity::Monthly,
            distribution: DistributionFamily::Gamma,
            min_samples: 10,
            clamp_bound: 3.09,
            zero_threshold: 0.0,
            water_balance_offset: 1000.0,
        }
    }

    // --- Builder methods ---

    /// Sets the series periodicity.
    pub fn with_periodicity(mut self, p: Periodicity) -> Self {
        self.periodicity = p;
        self
    }

    /// Sets the distribution family.
    pub fn with_distribution(mut self, d: DistributionFamily) -> Self {
        self.distribution = d;
        self
    }

    /// Sets the minimum number of calibration samples per position.
    pub fn with_min_samples(mut self, n: usize) -> Self {
        self.min_samples = n;
        self
    }

    /// Sets the symmetric bound applied to index values.
    pub fn with_clamp_bound(mut self, b: f64) -> Self {
        self.clamp_bound = b;
        self
    }

    /// Sets the value at or below which an observation counts as zero.
    pub fn with_zero_threshold(mut self, t: f64) -> Self {
        self.zero_threshold = t;
        self
    }

    /// Sets the per-period shift added to the water balance before fitting.
    pub fn with_water_balance_offset(mut self, o: f64) -> Self {
        self.water_balance_offset = o;
        self
    }

    // --- Accessors ---

    /// Returns the series periodicity.
    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Returns the distribution family.
    pub fn distribution(&self) -> DistributionFamily {
        self.distribution
    }

    /// Returns the minimum number of calibration samples per position.
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Returns the symmetric bound applied to index values.
    pub fn clamp_bound(&self) -> f64 {
        self.clamp_bound
    }

    /// Returns the zero threshold.
    pub fn zero_threshold(&self) -> f64 {
        self.zero_threshold
    }

    /// Returns the water balance offset.
    pub fn water_balance_offset(&self) -> f64 {
        self.water_balance_offset
    }

    /// Validates this configuration.
    ///
    /// Checks that `min_samples` is at least 1, `clamp_bound` is finite and
    /// positive, and `zero_threshold` and `water_balance_offset` are finite
    /// and non-negative.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.min_samples < 1 {
            return Err(IndexError::InvalidConfig {
                reason: format!("min_samples must be >= 1, got {}", self.min_samples),
            });
        }

        if !self.clamp_bound.is_finite() || self.clamp_bound <= 0.0 {
            return Err(IndexError::InvalidConfig {
                reason: format!(
                    "clamp_bound must be finite and > 0, got {}",
                    self.clamp_bound
                ),
            });
        }

        if !self.zero_threshold.is_finite() || self.zero_threshold < 0.0 {
            return Err(IndexError::InvalidConfig {
                reason: format!(
                    "zero_threshold must be finite and >= 0, got {}",
                    self.zero_threshold
                ),
            });
        }

        if !self.water_balance_offset.is_finite() || self.water_balance_offset < 0.0 {
            return Err(IndexError::InvalidConfig {
                reason: format!(
                    "water_balance_offset must be finite and >= 0, got {}",
                    self.water_balance_offset
                ),
            });
        }

        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}
