use tracing::warn;

use super::row::MortalityRow;
use crate::reference::ReferenceTables;

/// Subjects that found no match, in row order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JoinReport {
    pub unmapped_regions: Vec<String>,
    pub unmapped_districts: Vec<String>,
}

impl JoinReport {
    pub fn is_clean(&self) -> bool {
        self.unmapped_regions.is_empty() && self.unmapped_districts.is_empty()
    }
}

/// Left-join `rows` against the region table, then the district table.
///
/// Enrichment only: rows that miss keep their `None`s and are listed in the report.
pub fn join_regions(rows: &mut [MortalityRow], reference: &ReferenceTables) -> JoinReport {
    let mut report = JoinReport::default();

    for row in rows.iter_mut() {
        match reference.region(&row.normalized_key) {
            Some(region) => {
                row.region_code = Some(region.code.clone());
                row.district_code = Some(region.district_code.clone());
                row.is_summary_row = Some(region.is_summary_row);
            }
            None => report.unmapped_regions.push(row.subject.clone()),
        }
    }
    if !report.unmapped_regions.is_empty() {
        warn!(
            "region mapping not found: {}",
            report.unmapped_regions.join(",")
        );
    }

    for row in rows.iter_mut() {
        let district = row
            .district_code
            .as_deref()
            .and_then(|code| reference.district_by_code(code));
        match district {
            Some(d) => row.district_name = Some(d.name.clone()),
            None => report.unmapped_districts.push(
                row.district_code
                    .clone()
                    .unwrap_or_else(|| row.subject.clone()),
            ),
        }
    }
    if !report.unmapped_districts.is_empty() {
        warn!(
            "district mapping not found: {}",
            report.unmapped_districts.join(",")
        );
    }

    report
}
