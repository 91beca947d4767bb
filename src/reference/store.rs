use anyhow::{bail, Context, Result};
use std::{collections::HashMap, fs, path::Path};
use tracing::info;

use super::types::{FederalDistrict, ReferenceDocument, Region};
use crate::process::utils::normalize_key;

/// Immutable lookup tables built once per run and shared by reference with every
/// file-processing call.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    /// normalized region name → region
    regions: HashMap<String, Region>,
    /// normalized district name → district
    districts: HashMap<String, FederalDistrict>,
    /// district code → district
    districts_by_code: HashMap<String, FederalDistrict>,
}

impl ReferenceTables {
    /// Read and index the reference document at `path`.
    ///
    /// Any failure here is a configuration error: callers are expected to abort the run.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading reference data {:?}", path))?;
        let tables = Self::from_json_str(&text)
            .with_context(|| format!("parsing reference data {:?}", path))?;
        info!(
            regions = tables.regions.len(),
            districts = tables.districts.len(),
            "loaded reference data from {}",
            path.display()
        );
        Ok(tables)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: ReferenceDocument =
            serde_json::from_str(text).context("reference document is not valid JSON")?;
        Self::from_document(doc)
    }

    /// Index both tables by normalized name. Empty tables and colliding keys are rejected.
    pub fn from_document(doc: ReferenceDocument) -> Result<Self> {
        if doc.regions.is_empty() {
            bail!("reference document has no regions");
        }
        if doc.districts.is_empty() {
            bail!("reference document has no federal districts");
        }

        let mut regions = HashMap::with_capacity(doc.regions.len());
        for (id, region) in doc.regions {
            let key = normalize_key(&region.name);
            if let Some(prev) = regions.insert(key.clone(), region) {
                bail!(
                    "region `{}` collides with `{}` on key {}",
                    id,
                    prev.name,
                    key
                );
            }
        }

        let mut districts = HashMap::with_capacity(doc.districts.len());
        let mut districts_by_code = HashMap::with_capacity(doc.districts.len());
        for (id, district) in doc.districts {
            let key = normalize_key(&district.name);
            if districts_by_code
                .insert(district.code.clone(), district.clone())
                .is_some()
            {
                bail!("district `{}` reuses code {}", id, district.code);
            }
            if let Some(prev) = districts.insert(key.clone(), district) {
                bail!(
                    "district `{}` collides with `{}` on key {}",
                    id,
                    prev.name,
                    key
                );
            }
        }

        Ok(Self {
            regions,
            districts,
            districts_by_code,
        })
    }

    pub fn region(&self, key: &str) -> Option<&Region> {
        self.regions.get(key)
    }

    pub fn district_by_code(&self, code: &str) -> Option<&FederalDistrict> {
        self.districts_by_code.get(code)
    }

    /// True when `key` names a district entry flagged as a rollup (national or district total).
    pub fn is_summary_key(&self, key: &str) -> bool {
        self.districts
            .get(key)
            .map(|d| d.is_summary_row)
            .unwrap_or(false)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn district_count(&self) -> usize {
        self.districts.len()
    }
}
