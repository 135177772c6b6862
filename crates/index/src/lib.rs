//! Standardized drought indices: SPI, SPEI and percent of normal.
//!
//! Each calendar position (month, or day of a 366-day year) is treated as
//! its own climatology. A series is aggregated over the requested number
//! of periods, a distribution is fitted per position over a calibration
//! window, and every value is mapped through its own position's CDF onto
//! the standard normal scale.
//!
//! # Pipeline
//!
//! ```mermaid
//! flowchart LR
//!     A[raw series] --> B[aggregate]
//!     B --> C[fit_parameters]
//!     C --> D[ParameterSet]
//!     D --> E[standardize]
//!     B --> E
//!     E --> F[IndexResult]
//! ```
//!
//! 1. **Aggregate** the raw series over `scale` periods (missing-propagating sums)
//! 2. **Fit** one distribution per calendar position on the calibration window
//! 3. **Standardize**: CDF → inverse standard normal → clamp to `±bound`
//!
//! Fitting and application are separate phases so a [`ParameterSet`] can be
//! persisted (serde) and applied to new data.
//!
//! # Glossary
//!
//! - **SPI**: Standardized Precipitation Index (McKee et al. 1993)
//! - **SPEI**: Standardized Precipitation-Evapotranspiration Index, the SPI
//!   procedure applied to precipitation minus PET
//! - **PNP**: Percent of normal precipitation
//! - **Zero fraction (q)**: share of calibration values at or below the zero
//!   threshold; the gamma CDF becomes `H(x) = q + (1 - q) G(x)`
//! - **Calendar position**: 1..=12 (monthly) or 1..=366 (daily)
//!
//! # Quick Start
//!
//! ```no_run
//! use drought_index::{CalibrationWindow, IndexConfig, spi};
//!
//! let precip: Vec<f64> = vec![42.0; 360]; // 30 years of monthly totals
//! let positions: Vec<u16> = (0..360).map(|i| (i % 12 + 1) as u16).collect();
//!
//! let config = IndexConfig::new();
//! let result = spi(&precip, &positions, 3, CalibrationWindow::full(360), &config);
//! ```

mod aggregate;
mod batch;
mod config;
mod distribution;
mod error;
pub(crate) mod fit;
pub(crate) mod gamma;
mod normal;
mod pearson;
mod percent;
mod result;
mod standardize;
mod water_balance;

pub use aggregate::{aggregate, count_valid};
pub use batch::{IndexKind, SeriesRequest, compute_batch};
pub use config::{DistributionFamily, IndexConfig};
pub use distribution::{
    FittedDistribution, GammaFit, PositionFit, QualityFlag, QualityIssue, UnfittableReason,
};
pub use drought_calendar::{CalibrationWindow, Periodicity};
pub use error::IndexError;
pub use fit::{ParameterSet, fit_parameters};
pub use gamma::GammaParams;
pub use normal::NormalParams;
pub use pearson::PearsonParams;
pub use percent::{PositionNormals, fit_normals, percent_of_normal};
pub use result::{IndexResult, IndexSeries, Reference};
pub use standardize::{standardize, standardize_value};
pub use water_balance::water_balance;

use fit::reject_shifted_deficits;
use tracing::debug;

/// Validates a value series against its calendar positions.
pub(crate) fn validate_series(
    values: &[f64],
    positions: &[u16],
    periodicity: Periodicity,
) -> Result<(), IndexError> {
    if values.is_empty() {
        return Err(IndexError::EmptyData);
    }
    if values.len() != positions.len() {
        return Err(IndexError::LengthMismatch {
            values_len: values.len(),
            positions_len: positions.len(),
        });
    }
    drought_calendar::validate_positions(positions, periodicity)?;
    Ok(())
}

/// Validates that a calibration window is non-empty and inside the series.
pub(crate) fn validate_window(window: CalibrationWindow, len: usize) -> Result<(), IndexError> {
    if window.is_empty() || window.end() > len {
        return Err(IndexError::InvalidCalibrationWindow {
            start: window.start(),
            end: window.end(),
            len,
        });
    }
    Ok(())
}

fn validate_inputs(
    values: &[f64],
    positions: &[u16],
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<(), IndexError> {
    config.validate()?;
    validate_series(values, positions, config.periodicity())?;
    validate_window(window, values.len())
}

/// Fits and applies the configured distribution to an aggregated series.
fn standardized_index(
    fit_values: &[f64],
    positions: &[u16],
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<(IndexSeries, ParameterSet), IndexError> {
    let params = fit_parameters(fit_values, positions, window, config)?;
    let series = standardize(fit_values, positions, &params, config)?;
    Ok((series, params))
}

/// Computes the Standardized Precipitation Index.
///
/// # Arguments
///
/// * `precip`: Precipitation per period; NaN marks missing values.
/// * `positions`: Calendar position of each period.
/// * `scale`: Number of periods to accumulate.
/// * `window`: Periods used to fit the per-position distributions.
/// * `config`: Index configuration.
///
/// # Errors
///
/// Returns [`IndexError`] on invalid inputs. Positions that cannot be
/// fitted are reported in [`IndexResult::errors`] instead.
#[tracing::instrument(skip(precip, positions, config), fields(n = precip.len()))]
pub fn spi(
    precip: &[f64],
    positions: &[u16],
    scale: usize,
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<IndexResult, IndexError> {
    validate_inputs(precip, positions, window, config)?;
    let aggregated = aggregate(precip, scale)?;
    let (series, params) = standardized_index(&aggregated, positions, window, config)?;
    Ok(IndexResult::new(
        series,
        aggregated,
        Reference::Distribution(params),
    ))
}

/// Computes the Standardized Precipitation-Evapotranspiration Index.
///
/// `pet` must be on the same periods as `precip`: both are read against
/// `positions`, and only their lengths can be checked here.
///
/// The aggregated water balance is shifted by
/// `config.water_balance_offset() * scale` before fitting so that it has
/// positive support. A stored [`ParameterSet`] therefore applies to shifted
/// values; [`IndexResult::aggregated`] holds the unshifted balance. With
/// the gamma family, a position whose calibration deficit reaches the shift
/// is reported as [`IndexError::DegenerateDistribution`] instead of being
/// read as zero precipitation.
///
/// # Errors
///
/// Returns [`IndexError::MisalignedSeries`] if `pet` and `precip` differ
/// in length, and the same input errors as [`spi`].
#[tracing::instrument(skip(precip, pet, positions, config), fields(n = precip.len()))]
pub fn spei(
    precip: &[f64],
    pet: &[f64],
    positions: &[u16],
    scale: usize,
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<IndexResult, IndexError> {
    validate_inputs(precip, positions, window, config)?;
    let balance = water_balance(precip, pet)?;
    let aggregated = aggregate(&balance, scale)?;

    let offset = config.water_balance_offset() * scale as f64;
    let shifted: Vec<f64> = aggregated.iter().map(|v| v + offset).collect();
    debug!(offset, "shifted water balance");

    let mut params = fit_parameters(&shifted, positions, window, config)?;
    if config.distribution() == DistributionFamily::Gamma {
        reject_shifted_deficits(&mut params, &shifted, positions, offset, config.zero_threshold());
    }
    let series = standardize(&shifted, positions, &params, config)?;
    Ok(IndexResult::new(
        series,
        aggregated,
        Reference::Distribution(params),
    ))
}

/// Computes percent of normal precipitation.
///
/// # Errors
///
/// Returns [`IndexError`] on invalid inputs. Positions without a usable
/// calibration mean are reported in [`IndexResult::errors`] instead.
#[tracing::instrument(skip(precip, positions, config), fields(n = precip.len()))]
pub fn pnp(
    precip: &[f64],
    positions: &[u16],
    scale: usize,
    window: CalibrationWindow,
    config: &IndexConfig,
) -> Result<IndexResult, IndexError> {
    validate_inputs(precip, positions, window, config)?;
    let aggregated = aggregate(precip, scale)?;
    let (series, normals) = percent_of_normal(&aggregated, positions, window, config)?;
    Ok(IndexResult::new(
        series,
        aggregated,
        Reference::Normals(normals),
    ))
}
