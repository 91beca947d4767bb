// src/reference/types.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A subject of the federation as listed in `reg_map.json`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct Region {
    #[serde(rename = "reg_name")]
    pub name: String,
    #[serde(rename = "reg_code")]
    pub code: String,
    /// Parent federal district.
    #[serde(rename = "fo_code")]
    pub district_code: String,
    /// Composite subject (e.g. a region reported together with its autonomous okrugs).
    #[serde(rename = "summary")]
    pub is_summary_row: bool,
}

/// A federal district, or the national total.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct FederalDistrict {
    #[serde(rename = "fo_name")]
    pub name: String,
    #[serde(rename = "fo_code")]
    pub code: String,
    #[serde(rename = "summary")]
    pub is_summary_row: bool,
}

/// On-disk layout of the reference document: two maps keyed by a stable id.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub regions: BTreeMap<String, Region>,
    #[serde(rename = "fo")]
    pub districts: BTreeMap<String, FederalDistrict>,
}
