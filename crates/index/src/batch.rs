//! Parallel computation of one index over many independent series.

use std::fmt;
use std::str::FromStr;

use drought_calendar::CalibrationWindow;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::result::IndexResult;

/// Which index a batch computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Standardized Precipitation Index.
    Spi,
    /// Standardized Precipitation-Evapotranspiration Index.
    Spei,
    /// Percent of normal precipitation.
    Pnp,
}

impl IndexKind {
    /// Lower-case short name.
    pub fn name(self) -> &'static str {
        match self {
            IndexKind::Spi => "spi",
            IndexKind::Spei => "spei",
            IndexKind::Pnp => "pnp",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spi" => Ok(IndexKind::Spi),
            "spei" => Ok(IndexKind::Spei),
            "pnp" => Ok(IndexKind::Pnp),
            other => Err(IndexError::InvalidConfig {
                reason: format!("unknown index: {other:?}"),
            }),
        }
    }
}

/// Inputs of one series in a batch. All series share calendar positions.
#[derive(Debug, Clone, Copy)]
pub struct SeriesRequest<'a> {
    /// Precipitation per period.
    pub precip: &'a [f64],
    /// Potential evapotranspiration per period; required for SPEI.
    pub pet: Option<&'a [f64]>,
}

impl<'a> SeriesRequest<'a> {
    /// Request with precipitation only.
    pub fn precip(precip: &'a [f64]) -> Self {
        Self { precip, pet: None }
    }

    /// Request with precipitation and PET.
    pub fn with_pet(precip: &'a [f64], pet: &'a [f64]) -> Self {
        Self {
            precip,
            pet: Some(pet),
        }
    }
}

fn compute_one(
    kind: IndexKind,
    request: &SeriesRequest<'_>,
    positions: &[u16],
    scale: usize,
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<IndexResult, IndexError> {
    match kind {
        IndexKind::Spi => crate::spi(request.precip, positions, scale, window, config),
        IndexKind::Pnp => crate::pnp(request.precip, positions, scale, window, config),
        IndexKind::Spei => {
            let pet = request.pet.ok_or_else(|| IndexError::MisalignedSeries {
                reason: "SPEI requires a PET series".to_string(),
            })?;
            crate::spei(request.precip, pet, positions, scale, window, config)
        }
    }
}

/// Computes `kind` for every request on the rayon pool.
///
/// Results are returned in request order. A failing series yields an
/// `Err` in its slot and does not affect the others.
pub fn compute_batch(
    kind: IndexKind,
    requests: &[SeriesRequest<'_>],
    positions: &[u16],
    scale: usize,
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Vec<Result<IndexResult, IndexError>> {
    info!(%kind, n_series = requests.len(), scale, "computing batch");
    requests
        .par_iter()
        .map(|request| compute_one(kind, request, positions, scale, window, config))
        .collect()
}
