//! Pure conversion functions: TOML/JSON structs -> crate API types.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};

use drought_index::{CalibrationWindow, DistributionFamily, IndexConfig, Periodicity};
use drought_pet::PetMethod;

use crate::config::{CalibrationToml, IndexToml};

/// Parses a distribution family name.
pub fn parse_distribution(s: &str) -> Result<DistributionFamily> {
    Ok(s.parse::<DistributionFamily>()?)
}

/// Parses a PET method name.
pub fn parse_pet_method(s: &str) -> Result<PetMethod> {
    s.parse::<PetMethod>().map_err(|e| anyhow!(e))
}

/// Builds an [`IndexConfig`] from the TOML index section.
pub fn build_index_config(index: &IndexToml, periodicity: Periodicity) -> Result<IndexConfig> {
    let cfg = IndexConfig::new()
        .with_periodicity(periodicity)
        .with_distribution(parse_distribution(&index.distribution)?)
        .with_min_samples(index.min_samples)
        .with_clamp_bound(index.clamp_bound)
        .with_zero_threshold(index.zero_threshold)
        .with_water_balance_offset(index.water_balance_offset);
    cfg.validate().context("invalid [index] configuration")?;
    Ok(cfg)
}

/// Resolves the calibration window for a record of `len` periods.
///
/// Without a `[calibration]` section the full record is used.
pub fn build_window(
    calibration: Option<&CalibrationToml>,
    periodicity: Periodicity,
    start: NaiveDate,
    len: usize,
) -> Result<CalibrationWindow> {
    match calibration {
        None => Ok(CalibrationWindow::full(len)),
        Some(c) => CalibrationWindow::from_years(periodicity, start, len, c.start_year, c.end_year)
            .with_context(|| {
                format!(
                    "calibration years {}..={} do not overlap a record starting {} ({} periods)",
                    c.start_year,
                    c.end_year,
                    start.year(),
                    len
                )
            }),
    }
}

/// JSON nulls to NaN.
pub fn to_nan(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

/// NaN (and other non-finite values) to JSON nulls.
pub fn to_nullable(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|&v| v.is_finite().then_some(v))
        .collect()
}
