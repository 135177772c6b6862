use serde::Deserialize;

/// Top-level `drought.toml` configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DroughtConfig {
    /// Index computation settings.
    #[serde(default)]
    pub index: IndexToml,

    /// Calibration period; the full record when omitted.
    #[serde(default)]
    pub calibration: Option<CalibrationToml>,

    /// PET estimation settings.
    #[serde(default)]
    pub pet: PetToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexToml {
    #[serde(default = "default_scale")]
    pub scale: usize,
    #[serde(default = "default_distribution")]
    pub distribution: String,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "default_clamp_bound")]
    pub clamp_bound: f64,
    #[serde(default)]
    pub zero_threshold: f64,
    #[serde(default = "default_water_balance_offset")]
    pub water_balance_offset: f64,
}

impl Default for IndexToml {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            distribution: default_distribution(),
            min_samples: default_min_samples(),
            clamp_bound: default_clamp_bound(),
            zero_threshold: 0.0,
            water_balance_offset: default_water_balance_offset(),
        }
    }
}

fn default_scale() -> usize {
    1
}
fn default_distribution() -> String {
    "gamma".to_string()
}
fn default_min_samples() -> usize {
    10
}
fn default_clamp_bound() -> f64 {
    3.09
}
fn default_water_balance_offset() -> f64 {
    1000.0
}

/// Inclusive calendar-year calibration range.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationToml {
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PetToml {
    #[serde(default = "default_pet_method")]
    pub method: String,
}

impl Default for PetToml {
    fn default() -> Self {
        Self {
            method: default_pet_method(),
        }
    }
}

fn default_pet_method() -> String {
    "thornthwaite".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: DroughtConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.index.scale, 1);
        assert_eq!(cfg.index.distribution, "gamma");
        assert_eq!(cfg.index.min_samples, 10);
        assert!(cfg.calibration.is_none());
        assert_eq!(cfg.pet.method, "thornthwaite");
    }

    #[test]
    fn full_file() {
        let cfg: DroughtConfig = toml::from_str(
            r#"
            [index]
            scale = 3
            distribution = "pearson3"
            min_samples = 20
            zero_threshold = 0.1

            [calibration]
            start_year = 1981
            end_year = 2010

            [pet]
            method = "hargreaves"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.index.scale, 3);
        assert_eq!(cfg.index.distribution, "pearson3");
        assert!((cfg.index.clamp_bound - 3.09).abs() < f64::EPSILON);
        let cal = cfg.calibration.unwrap();
        assert_eq!((cal.start_year, cal.end_year), (1981, 2010));
        assert_eq!(cfg.pet.method, "hargreaves");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<DroughtConfig>("[index]\nscales = 3\n").is_err());
        assert!(toml::from_str::<DroughtConfig>("[output]\npath = \"x\"\n").is_err());
    }
}
