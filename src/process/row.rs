use super::period::Period;

/// A subject-level mortality record for one reporting month.
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityRow {
    /// Subject name as printed in the release.
    pub subject: String,
    pub normalized_key: String,
    pub total_deaths: Option<f64>,
    pub confirmed_covid_deaths: Option<f64>,
    pub possible_covid_deaths: Option<f64>,
    pub period: Period,
    // filled by the region join; stay `None` on a miss
    pub region_code: Option<String>,
    pub district_code: Option<String>,
    pub district_name: Option<String>,
    pub is_summary_row: Option<bool>,
}
