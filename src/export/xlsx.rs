use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

use super::OUTPUT_COLUMNS;
use crate::compile::ConsolidatedDataset;

const SHEET_NAME: &str = "covid_russia";

/// Write the dataset as a single-sheet workbook: a bold header row, then one row per record.
/// Nulls are left as empty cells.
pub fn write_xlsx<P: AsRef<Path>>(dataset: &ConsolidatedDataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    fill_sheet(sheet, dataset).context("filling output sheet")?;
    workbook
        .save(path)
        .with_context(|| format!("saving workbook {:?}", path))?;
    Ok(())
}

fn fill_sheet(sheet: &mut Worksheet, dataset: &ConsolidatedDataset) -> Result<(), XlsxError> {
    sheet.set_name(SHEET_NAME)?;
    let bold = Format::new().set_bold();
    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }

    for (i, row) in dataset.rows().iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &row.subject)?;
        for (col, value) in [
            (1, row.total_deaths),
            (2, row.confirmed_covid_deaths),
            (3, row.possible_covid_deaths),
        ] {
            if let Some(v) = value {
                sheet.write_number(r, col, v)?;
            }
        }
        sheet.write_string(r, 4, row.period.as_date_string())?;
        for (col, value) in [
            (5, &row.region_code),
            (6, &row.district_code),
            (7, &row.district_name),
        ] {
            if let Some(v) = value {
                sheet.write_string(r, col, v)?;
            }
        }
        if let Some(flag) = row.is_summary_row {
            sheet.write_boolean(r, 8, flag)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::tests::sample_row;
    use calamine::{open_workbook_auto, Data, Reader};

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("covid_russia.xlsx");
        let mut unmapped = sample_row("Нет такой области", 6, 2021);
        unmapped.region_code = None;
        let dataset = ConsolidatedDataset::from_parts(vec![vec![
            sample_row("Брянская область", 3, 2021),
            unmapped,
        ]]);

        write_xlsx(&dataset, &path)?;

        let mut wb = open_workbook_auto(&path)?;
        assert_eq!(wb.sheet_names(), vec![SHEET_NAME.to_string()]);
        let range = wb.worksheet_range(SHEET_NAME)?;
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], Data::String("subject".into()));
        assert_eq!(rows[0][8], Data::String("is_summary_row".into()));

        // sorted by subject: "Брянская" < "Нет"
        assert_eq!(rows[1][0], Data::String("Брянская область".into()));
        assert_eq!(rows[1][1], Data::Float(100.0));
        assert_eq!(rows[1][4], Data::String("2021-03-01".into()));
        assert_eq!(rows[1][5], Data::String("RU-BRY".into()));
        assert_eq!(rows[2][5], Data::Empty);
        Ok(())
    }

    #[test]
    fn test_empty_dataset_writes_header_only() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("empty.xlsx");
        write_xlsx(&ConsolidatedDataset::default(), &path)?;

        let mut wb = open_workbook_auto(&path)?;
        let range = wb.worksheet_range(SHEET_NAME)?;
        assert_eq!(range.rows().count(), 1);
        Ok(())
    }
}
