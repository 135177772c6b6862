//! JSON series documents read and written by the CLI.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use drought_index::Periodicity;
use serde::{Deserialize, Serialize};

/// Input document: calendar metadata plus one entry per site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesDocument {
    #[serde(default)]
    pub periodicity: Periodicity,
    pub start: NaiveDate,
    pub sites: Vec<SiteSeries>,
}

/// Series for one site; `null` entries are missing values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSeries {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_mean: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<Vec<Option<f64>>>,
}

pub fn read_document(path: &Path) -> Result<SeriesDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse series JSON: {}", path.display()))
}

/// Writes `value` as pretty JSON to `path`, or to stdout when `None`.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match path {
        Some(p) => {
            fs::write(p, text).with_context(|| format!("failed to write output: {}", p.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nulls_and_defaults() {
        let doc: SeriesDocument = serde_json::from_str(
            r#"{
                "start": "1990-01-01",
                "sites": [{"id": "a", "precip": [1.0, null, 3.5]}]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.periodicity, Periodicity::Monthly);
        assert_eq!(doc.start, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert_eq!(
            doc.sites[0].precip.as_deref(),
            Some(&[Some(1.0), None, Some(3.5)][..])
        );
        assert!(doc.sites[0].latitude.is_none());
    }

    #[test]
    fn rejects_unknown_site_fields() {
        let r: Result<SeriesDocument, _> = serde_json::from_str(
            r#"{"start": "1990-01-01", "sites": [{"id": "a", "rain": [1.0]}]}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn round_trip_through_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("doc.json");
        let doc = SeriesDocument {
            periodicity: Periodicity::Daily,
            start: NaiveDate::from_ymd_opt(2000, 3, 1).unwrap(),
            sites: vec![SiteSeries {
                id: "x".to_string(),
                latitude: Some(12.5),
                temp_mean: Some(vec![Some(20.0), None]),
                ..Default::default()
            }],
        };
        write_json(Some(path.as_path()), &doc).unwrap();
        assert_eq!(read_document(&path).unwrap(), doc);
    }
}
