use anyhow::{bail, Result};
use std::{env, path::PathBuf, str::FromStr};

/// What a non-numeric metric cell does to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericPolicy {
    /// The whole run fails.
    #[default]
    AbortRun,
    /// Only the offending file is skipped.
    SkipFile,
}

impl FromStr for NumericPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort-run" | "abort" => Ok(NumericPolicy::AbortRun),
            "skip-file" | "skip" => Ok(NumericPolicy::SkipFile),
            other => bail!(
                "unknown numeric policy `{}` (expected `abort-run` or `skip-file`)",
                other
            ),
        }
    }
}

/// Locations and policies for one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Input extension, without the dot.
    pub input_extension: String,
    pub reference_path: PathBuf,
    pub output_xlsx: PathBuf,
    pub output_parquet: Option<PathBuf>,
    pub numeric_policy: NumericPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            input_extension: "xlsx".into(),
            reference_path: PathBuf::from("reg_map.json"),
            output_xlsx: PathBuf::from("covid_russia.xlsx"),
            output_parquet: None,
            numeric_policy: NumericPolicy::default(),
        }
    }
}

impl Config {
    /// Defaults overridden by `COVIDSTAT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("COVIDSTAT_DATA_DIR") {
            cfg.data_dir = v.into();
        }
        if let Some(v) = get("COVIDSTAT_INPUT_EXT") {
            cfg.input_extension = v.trim_start_matches('.').to_string();
        }
        if let Some(v) = get("COVIDSTAT_REFERENCE") {
            cfg.reference_path = v.into();
        }
        if let Some(v) = get("COVIDSTAT_OUTPUT") {
            cfg.output_xlsx = v.into();
        }
        if let Some(v) = get("COVIDSTAT_OUTPUT_PARQUET") {
            cfg.output_parquet = Some(v.into());
        }
        if let Some(v) = get("COVIDSTAT_NUMERIC_POLICY") {
            cfg.numeric_policy = v.parse()?;
        }
        Ok(cfg)
    }
}
