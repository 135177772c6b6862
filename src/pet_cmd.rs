//! PET command: estimate potential evapotranspiration for every site.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use drought_index::Periodicity;
use drought_pet::{PetMethod, hargreaves, thornthwaite};

use crate::cli::PetArgs;
use crate::config::DroughtConfig;
use crate::convert;
use crate::series::{self, SeriesDocument, SiteSeries};

/// Reads the optional TOML configuration.
pub fn load_config(path: Option<&std::path::Path>) -> Result<DroughtConfig> {
    match path {
        None => Ok(DroughtConfig::default()),
        Some(p) => {
            let toml_str = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read config file: {}", p.display()))?;
            toml::from_str(&toml_str).context("failed to parse TOML config")
        }
    }
}

/// Mean temperature for Thornthwaite: `temp_mean`, else the min/max midpoint.
fn mean_temperature(site: &SiteSeries) -> Result<Vec<f64>> {
    if let Some(t) = &site.temp_mean {
        return Ok(convert::to_nan(t));
    }
    match (&site.temp_min, &site.temp_max) {
        (Some(lo), Some(hi)) if lo.len() == hi.len() => Ok(convert::to_nan(lo)
            .iter()
            .zip(convert::to_nan(hi))
            .map(|(a, b)| (a + b) / 2.0)
            .collect()),
        (Some(lo), Some(hi)) => bail!(
            "temp_min has {} values, temp_max has {}",
            lo.len(),
            hi.len()
        ),
        _ => bail!("no temperature series: need temp_mean or temp_min and temp_max"),
    }
}

/// Estimates PET for one site from its temperatures and latitude.
pub fn site_pet(
    site: &SiteSeries,
    doc: &SeriesDocument,
    method: PetMethod,
) -> Result<Vec<f64>> {
    let latitude = site
        .latitude
        .with_context(|| format!("site {:?} has no latitude", site.id))?;

    match method {
        PetMethod::Thornthwaite => {
            if doc.periodicity != Periodicity::Monthly {
                bail!("Thornthwaite PET requires a monthly series");
            }
            let temp = mean_temperature(site)?;
            let months = drought_calendar::positions(doc.periodicity, doc.start, temp.len());
            Ok(thornthwaite(&temp, &months, latitude)?)
        }
        PetMethod::Hargreaves => {
            let (Some(lo), Some(hi)) = (&site.temp_min, &site.temp_max) else {
                bail!("Hargreaves PET requires temp_min and temp_max");
            };
            let tmin = convert::to_nan(lo);
            let tmax = convert::to_nan(hi);
            let tmean = site.temp_mean.as_deref().map(convert::to_nan);
            let positions = drought_calendar::positions(doc.periodicity, doc.start, tmin.len());
            Ok(hargreaves(
                &tmin,
                &tmax,
                tmean.as_deref(),
                &positions,
                doc.periodicity,
                latitude,
            )?)
        }
    }
}

/// Run the PET estimation and write the document back with `pet` filled in.
pub fn run(args: PetArgs) -> Result<()> {
    let _cmd = info_span!("pet").entered();
    let config = load_config(args.config.as_deref())?;
    let method = convert::parse_pet_method(&config.pet.method)?;

    let mut doc = series::read_document(&args.input)?;
    info!(n_sites = doc.sites.len(), ?method, "estimating PET");

    let estimates: Vec<Result<Vec<f64>>> = doc
        .sites
        .iter()
        .map(|site| site_pet(site, &doc, method))
        .collect();

    let mut n_failed = 0usize;
    for (site, estimate) in doc.sites.iter_mut().zip(estimates) {
        match estimate {
            Ok(pet) => site.pet = Some(convert::to_nullable(&pet)),
            Err(e) => {
                warn!(site = %site.id, error = %format!("{e:#}"), "PET estimation failed");
                n_failed += 1;
            }
        }
    }
    if n_failed == doc.sites.len() && n_failed > 0 {
        bail!("PET estimation failed for every site");
    }

    series::write_json(args.output.as_deref(), &doc)?;
    info!(n_failed, "PET written");
    Ok(())
}
