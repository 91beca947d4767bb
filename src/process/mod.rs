// src/process/mod.rs
use anyhow::Result;
use std::{fmt, path::Path};
use tracing::{info, warn};

use crate::reference::ReferenceTables;

pub mod extract;
pub mod join;
pub mod normalize;
pub mod period;
pub mod raw_table;
pub mod row;
pub mod sheet;
pub mod utils;

pub use period::Period;
pub use raw_table::RawSheet;
pub use row::MortalityRow;

/// Why a file was left out of the batch. None of these stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file name has no (month, year) pair.
    UnparseablePeriod,
    /// No sheet name contains a form 5.1 marker.
    SheetNotFound,
    /// The located sheet has no national-total row in column 0.
    AnchorNotFound,
    /// The workbook could not be opened or the sheet could not be read.
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnparseablePeriod => write!(f, "cannot determine period from file name"),
            SkipReason::SheetNotFound => write!(f, "COVID statistics sheet (form 5.1) not found"),
            SkipReason::AnchorNotFound => write!(f, "table start (national total row) not found"),
            SkipReason::Unreadable(e) => write!(f, "workbook unreadable: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    Processed {
        period: Period,
        rows: Vec<MortalityRow>,
    },
    Skipped(SkipReason),
}

impl FileOutcome {
    fn skipped(reason: SkipReason) -> Self {
        warn!("{}, skipping file", reason);
        FileOutcome::Skipped(reason)
    }
}

/// Period → sheet → table → rows → join for one workbook.
///
/// Structural problems come back as [`FileOutcome::Skipped`]; an `Err` is a metric cell that
/// could not be read as a number.
#[tracing::instrument(level = "info", skip(path, reference), fields(file = %path.as_ref().display()))]
pub fn process_file<P: AsRef<Path>>(path: P, reference: &ReferenceTables) -> Result<FileOutcome> {
    let path = path.as_ref();
    info!("processing started");

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let Some(period) = period::parse_period(&file_name) else {
        return Ok(FileOutcome::skipped(SkipReason::UnparseablePeriod));
    };
    info!(%period, "period detected");

    let sheet = match sheet::read_form_sheet(path) {
        Ok(Some(sheet)) => sheet,
        Ok(None) => return Ok(FileOutcome::skipped(SkipReason::SheetNotFound)),
        Err(e) => return Ok(FileOutcome::skipped(SkipReason::Unreadable(format!("{:#}", e)))),
    };

    process_sheet(&sheet, period, reference)
}

/// Everything after the workbook is read; split out so a grid can be fed directly.
pub fn process_sheet(
    sheet: &RawSheet,
    period: Period,
    reference: &ReferenceTables,
) -> Result<FileOutcome> {
    let table = match extract::extract_table(sheet, period) {
        Ok(t) => t,
        Err(reason) => return Ok(FileOutcome::skipped(reason)),
    };

    let mut rows = normalize::normalize_rows(table, period, reference)?;
    join::join_regions(&mut rows, reference);

    info!("done, {} rows saved", rows.len());
    Ok(FileOutcome::Processed { period, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::store::tests::SAMPLE;
    use calamine::Data;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,covidstat::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_process_sheet_end_to_end() -> Result<()> {
        init_test_logging();
        let reference = ReferenceTables::from_json_str(SAMPLE)?;
        let sheet = RawSheet::new(
            "5.1",
            vec![
                vec![s("Российская Федерация"), Data::Float(100.0), Data::Float(10.0), Data::Float(1.0)],
                vec![s("Центральный федеральный округ"), Data::Float(50.0), Data::Float(5.0), Data::Float(0.0)],
                vec![s("Белгородская область"), Data::Float(20.0), Data::Float(2.0), Data::Empty],
                vec![s("Неизвестная область"), Data::Float(1.0), Data::Float(0.0), Data::Float(0.0)],
                vec![s("Информация")],
            ],
        );
        let outcome = process_sheet(&sheet, Period::new(3, 2021).unwrap(), &reference)?;
        let FileOutcome::Processed { period, rows } = outcome else {
            panic!("expected processed outcome");
        };
        assert_eq!(period, Period::new(3, 2021).unwrap());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.normalized_key != "РОССИЙСКАЯФЕДЕРАЦИЯ"));
        assert_eq!(rows[0].region_code.as_deref(), Some("RU-BEL"));
        assert_eq!(rows[1].region_code, None);
        Ok(())
    }

    #[test]
    fn test_missing_anchor_is_skip_not_error() -> Result<()> {
        init_test_logging();
        let reference = ReferenceTables::from_json_str(SAMPLE)?;
        let sheet = RawSheet::new("5.1", vec![vec![s("Белгородская область"), s("oops")]]);
        let outcome = process_sheet(&sheet, Period::new(3, 2021).unwrap(), &reference)?;
        assert!(matches!(
            outcome,
            FileOutcome::Skipped(SkipReason::AnchorNotFound)
        ));
        Ok(())
    }

    #[test]
    fn test_unparseable_name_is_skip() -> Result<()> {
        init_test_logging();
        let reference = ReferenceTables::from_json_str(SAMPLE)?;
        // the name is rejected before the file is opened
        let outcome = process_file("data/edn.xlsx", &reference)?;
        assert!(matches!(
            outcome,
            FileOutcome::Skipped(SkipReason::UnparseablePeriod)
        ));
        Ok(())
    }

    #[test]
    fn test_unreadable_workbook_is_skip() -> Result<()> {
        init_test_logging();
        let reference = ReferenceTables::from_json_str(SAMPLE)?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("edn05_2021.xlsx");
        std::fs::write(&path, b"garbage")?;
        let outcome = process_file(&path, &reference)?;
        assert!(matches!(
            outcome,
            FileOutcome::Skipped(SkipReason::Unreadable(_))
        ));
        Ok(())
    }
}
