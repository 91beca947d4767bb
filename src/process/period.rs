use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("static regex"));

/// Some releases put the year before the month; a leading run at or above this is a year.
const YEAR_FIRST_THRESHOLD: u64 = 2020;

/// Reporting month of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    // field order gives chronological Ord
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Checked constructor; `None` unless `month` is 1..=12.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// `YYYY-MM-01`, the form stamped on every output row.
    pub fn as_date_string(&self) -> String {
        format!("{:04}-{:02}-01", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:04}", self.month, self.year)
    }
}

/// Derive the reporting period from a file name such as `edn10_2021.xlsx` or `2021_edn10.xlsx`.
///
/// The first two digit runs are read as (month, year), swapped when the first one looks like
/// a year. Returns `None` when fewer than two runs exist or they do not form a valid month.
pub fn parse_period(file_name: &str) -> Option<Period> {
    let mut runs = DIGIT_RUNS.find_iter(file_name).map(|m| m.as_str());
    let a: u64 = runs.next()?.parse().ok()?;
    let b: u64 = runs.next()?.parse().ok()?;

    let (month, year) = if a >= YEAR_FIRST_THRESHOLD { (b, a) } else { (a, b) };
    Period::new(u32::try_from(month).ok()?, i32::try_from(year).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_then_year() {
        assert_eq!(parse_period("edn10_2021.xlsx"), Period::new(10, 2021));
    }

    #[test]
    fn test_year_first_is_swapped() {
        assert_eq!(parse_period("2021_edn10.xlsx"), Period::new(10, 2021));
        assert_eq!(parse_period("2020-05.xlsx"), Period::new(5, 2020));
    }

    #[test]
    fn test_only_first_two_runs_count() {
        assert_eq!(parse_period("2021_edn06_v2.xlsx"), Period::new(6, 2021));
        assert_eq!(parse_period("edn03_2021_final7.xlsx"), Period::new(3, 2021));
    }

    #[test]
    fn test_unparseable_names() {
        assert_eq!(parse_period("edn.xlsx"), None);
        assert_eq!(parse_period("edn2021.xlsx"), None);
        assert_eq!(parse_period("edn13_2021.xlsx"), None);
        assert_eq!(parse_period("99999999999999999999999_2021.xlsx"), None);
        assert_eq!(parse_period("edn٣_٢٠٢١.xlsx"), None);
    }

    #[test]
    fn test_formatting_and_order() {
        let p = Period::new(3, 2021).unwrap();
        assert_eq!(p.as_date_string(), "2021-03-01");
        assert_eq!(p.to_string(), "03.2021");
        assert_eq!(p.first_day(), NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert!(Period::new(12, 2020).unwrap() < p);
        assert!(p < Period::new(1, 2022).unwrap());
    }
}
