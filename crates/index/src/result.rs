//! Result types for index computation.

use serde::{Serialize, Serializer};

use crate::error::IndexError;
use crate::fit::ParameterSet;
use crate::percent::PositionNormals;

fn errors_as_strings<S: Serializer>(errors: &[IndexError], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(errors.iter().map(ToString::to_string))
}

/// A computed series together with the per-position errors that left
/// values missing.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSeries {
    values: Vec<f64>,
    #[serde(serialize_with = "errors_as_strings")]
    errors: Vec<IndexError>,
}

impl IndexSeries {
    pub(crate) fn new(values: Vec<f64>, errors: Vec<IndexError>) -> Self {
        Self { values, errors }
    }

    /// Output values; NaN where missing.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// One error per position whose values could not be computed.
    pub fn errors(&self) -> &[IndexError] {
        &self.errors
    }

    /// Consumes `self` and returns the values and errors.
    pub fn into_parts(self) -> (Vec<f64>, Vec<IndexError>) {
        (self.values, self.errors)
    }
}

/// What the index values were computed against.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    /// Fitted distributions (SPI, SPEI).
    Distribution(ParameterSet),
    /// Calibration means (percent of normal).
    Normals(PositionNormals),
}

/// Output of an index pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct IndexResult {
    index: Vec<f64>,
    aggregated: Vec<f64>,
    reference: Reference,
    #[serde(serialize_with = "errors_as_strings")]
    errors: Vec<IndexError>,
}

impl IndexResult {
    pub(crate) fn new(series: IndexSeries, aggregated: Vec<f64>, reference: Reference) -> Self {
        let (index, errors) = series.into_parts();
        Self {
            index,
            aggregated,
            reference,
            errors,
        }
    }

    /// Index values; NaN where missing.
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    /// Consumes `self` and returns the owned index values.
    pub fn into_index(self) -> Vec<f64> {
        self.index
    }

    /// The aggregated input series (unshifted water balance for SPEI).
    pub fn aggregated(&self) -> &[f64] {
        &self.aggregated
    }

    /// Parameters or normals the index was computed against.
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Fitted parameters, for distribution-based indices.
    pub fn parameters(&self) -> Option<&ParameterSet> {
        match &self.reference {
            Reference::Distribution(p) => Some(p),
            Reference::Normals(_) => None,
        }
    }

    /// Calibration means, for percent of normal.
    pub fn normals(&self) -> Option<&PositionNormals> {
        match &self.reference {
            Reference::Normals(n) => Some(n),
            Reference::Distribution(_) => None,
        }
    }

    /// One error per position whose values could not be computed.
    pub fn errors(&self) -> &[IndexError] {
        &self.errors
    }
}
