//! Index command: compute SPI, SPEI or PNP for every site of a document.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use drought_index::{
    IndexKind, IndexResult, Periodicity, Reference, SeriesRequest, compute_batch,
};

use crate::cli::IndexArgs;
use crate::convert;
use crate::pet_cmd::{load_config, site_pet};
use crate::series::{self, SeriesDocument, SiteSeries};

/// Output document of an index run.
#[derive(Debug, Serialize)]
pub struct IndexOutput {
    pub index: IndexKind,
    pub scale: usize,
    pub periodicity: Periodicity,
    pub start: NaiveDate,
    pub sites: Vec<SiteOutput>,
}

/// Per-site output: either the index or the reason the site failed.
#[derive(Debug, Serialize)]
pub struct SiteOutput {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quality_flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SiteOutput {
    fn failed(id: &str, error: String) -> Self {
        Self {
            id: id.to_string(),
            values: None,
            errors: Vec::new(),
            quality_flags: Vec::new(),
            reference: None,
            error: Some(error),
        }
    }

    fn from_result(id: &str, result: IndexResult) -> Self {
        let quality_flags = result
            .parameters()
            .map(|p| {
                p.quality_flags()
                    .iter()
                    .map(|f| format!("position {}: {}", f.position, f.issue))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            id: id.to_string(),
            values: Some(convert::to_nullable(result.index())),
            errors: result.errors().iter().map(ToString::to_string).collect(),
            quality_flags,
            reference: Some(result.reference().clone()),
            error: None,
        }
    }
}

/// Site inputs converted to NaN-marked series.
struct PreparedSite {
    precip: Vec<f64>,
    pet: Option<Vec<f64>>,
}

fn prepare_site(
    kind: IndexKind,
    site: &SiteSeries,
    doc: &SeriesDocument,
    len: usize,
    pet_method: drought_pet::PetMethod,
) -> Result<PreparedSite> {
    let precip = site
        .precip
        .as_deref()
        .map(convert::to_nan)
        .context("no precip series")?;
    if precip.len() != len {
        bail!("precip has {} values, record has {len}", precip.len());
    }

    let pet = match (kind, &site.pet) {
        (IndexKind::Spei, Some(pet)) => Some(convert::to_nan(pet)),
        (IndexKind::Spei, None) => {
            debug!(site = %site.id, "deriving PET from temperature");
            Some(site_pet(site, doc, pet_method).context("failed to derive PET")?)
        }
        _ => None,
    };
    Ok(PreparedSite { precip, pet })
}

/// Computes the index for every site of `doc`.
pub fn compute(
    kind: IndexKind,
    doc: &SeriesDocument,
    config: &crate::config::DroughtConfig,
    scale: usize,
) -> Result<IndexOutput> {
    let index_cfg = convert::build_index_config(&config.index, doc.periodicity)?;
    let pet_method = convert::parse_pet_method(&config.pet.method)?;

    // The first site with precipitation fixes the record length.
    let len = doc
        .sites
        .iter()
        .find_map(|s| s.precip.as_ref().map(Vec::len))
        .context("no site has a precip series")?;
    let positions = drought_calendar::positions(doc.periodicity, doc.start, len);
    let window = convert::build_window(
        config.calibration.as_ref(),
        doc.periodicity,
        doc.start,
        len,
    )?;
    info!(
        %kind,
        n_sites = doc.sites.len(),
        len,
        window_start = window.start(),
        window_end = window.end(),
        "computing index"
    );

    let prepared: Vec<Result<PreparedSite>> = doc
        .sites
        .iter()
        .map(|site| prepare_site(kind, site, doc, len, pet_method))
        .collect();

    let requests: Vec<SeriesRequest<'_>> = prepared
        .iter()
        .filter_map(|p| p.as_ref().ok())
        .map(|p| SeriesRequest {
            precip: &p.precip,
            pet: p.pet.as_deref(),
        })
        .collect();
    let mut results =
        compute_batch(kind, &requests, &positions, scale, window, &index_cfg).into_iter();

    let mut sites = Vec::with_capacity(doc.sites.len());
    for (site, prep) in doc.sites.iter().zip(&prepared) {
        let output = match prep {
            Err(e) => SiteOutput::failed(&site.id, format!("{e:#}")),
            Ok(_) => match results.next() {
                Some(Ok(result)) => SiteOutput::from_result(&site.id, result),
                Some(Err(e)) => SiteOutput::failed(&site.id, e.to_string()),
                None => bail!("batch returned fewer results than requests"),
            },
        };
        if let Some(e) = &output.error {
            warn!(site = %site.id, error = %e, "site failed");
        }
        sites.push(output);
    }

    Ok(IndexOutput {
        index: kind,
        scale,
        periodicity: doc.periodicity,
        start: doc.start,
        sites,
    })
}

/// Run an index subcommand.
pub fn run(kind: IndexKind, args: IndexArgs) -> Result<()> {
    let _cmd = info_span!("index", %kind).entered();
    let config = load_config(args.config.as_deref())?;
    let scale = args.scale.unwrap_or(config.index.scale);

    let doc = series::read_document(&args.input)?;
    if doc.sites.is_empty() {
        bail!("input document contains no sites");
    }

    let output = compute(kind, &doc, &config, scale)?;
    let n_failed = output.sites.iter().filter(|s| s.error.is_some()).count();
    series::write_json(args.output.as_deref(), &output)?;
    info!(n_sites = output.sites.len(), n_failed, "index written");
    Ok(())
}
