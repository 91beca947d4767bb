use anyhow::{anyhow, Result};
use calamine::Data;
use tracing::debug;

use super::period::Period;
use super::raw_table::{RawRow, RawTable};
use super::row::MortalityRow;
use super::utils::{clean_str, normalize_key};
use crate::reference::ReferenceTables;

/// Turn an extracted block into subject-level rows stamped with `period`.
///
/// Rows naming a rollup district entry (national or district totals) and rows with a blank
/// subject are dropped. A metric cell that is not numeric fails the whole call.
pub fn normalize_rows(
    table: RawTable,
    period: Period,
    reference: &ReferenceTables,
) -> Result<Vec<MortalityRow>> {
    let mut out = Vec::with_capacity(table.rows.len());
    let mut dropped_summary = 0usize;

    for raw in table.rows {
        let Some(subject) = subject_text(&raw.subject) else {
            debug!(row = raw.sheet_row + 1, "blank subject, row skipped");
            continue;
        };
        let normalized_key = normalize_key(&subject);
        if reference.is_summary_key(&normalized_key) {
            dropped_summary += 1;
            continue;
        }

        let row = MortalityRow {
            total_deaths: coerce_metric(&raw, "total_deaths", &raw.total_deaths)?,
            confirmed_covid_deaths: coerce_metric(
                &raw,
                "confirmed_covid_deaths",
                &raw.confirmed_covid_deaths,
            )?,
            possible_covid_deaths: coerce_metric(
                &raw,
                "possible_covid_deaths",
                &raw.possible_covid_deaths,
            )?,
            subject,
            normalized_key,
            period,
            region_code: None,
            district_code: None,
            district_name: None,
            is_summary_row: None,
        };
        out.push(row);
    }

    debug!(kept = out.len(), dropped_summary, "rows normalized");
    Ok(out)
}

/// Subject name as text; numeric labels are kept as their printed form.
fn subject_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => return None,
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn coerce_metric(raw: &RawRow, column: &str, cell: &Data) -> Result<Option<f64>> {
    coerce_number(cell).map_err(|value| {
        anyhow!(
            "row {}, column {}: cannot convert {:?} to a number",
            raw.sheet_row + 1,
            column,
            value
        )
    })
}

/// Numeric value of a cell: empty → `None`; anything non-numeric → `Err(printed value)`.
pub fn coerce_number(cell: &Data) -> std::result::Result<Option<f64>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::Float(v) => Ok(Some(*v)),
        Data::Int(v) => Ok(Some(*v as f64)),
        Data::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
        Data::String(s) => {
            let v = clean_str(s);
            if v.is_empty() {
                Ok(None)
            } else {
                v.parse::<f64>().map(Some).map_err(|_| s.clone())
            }
        }
        other => Err(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::store::tests::SAMPLE;

    fn raw(row: usize, subject: Data, total: Data) -> RawRow {
        RawRow {
            sheet_row: row,
            subject,
            total_deaths: total,
            confirmed_covid_deaths: Data::Int(5),
            possible_covid_deaths: Data::Empty,
        }
    }

    fn table(rows: Vec<RawRow>) -> RawTable {
        RawTable {
            layout_name: "single-year",
            rows,
        }
    }

    #[test]
    fn test_keys_period_and_numbers() -> Result<()> {
        let reference = ReferenceTables::from_json_str(SAMPLE)?;
        let period = Period::new(3, 2021).unwrap();
        let rows = normalize_rows(
            table(vec![
                raw(3, Data::String(" Брянская  область ".into()), Data::String(" 1204 ".into())),
                raw(4, Data::String("Белгородская область".into()), Data::Float(1500.0)),
            ]),
            period,
            &reference,
        )?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subject, "Брянская  область");
        assert_eq!(rows[0].normalized_key, "БРЯНСКАЯОБЛАСТЬ");
        assert_eq!(rows[0].total_deaths, Some(1204.0));
        assert_eq!(rows[0].confirmed_covid_deaths, Some(5.0));
        assert_eq!(rows[0].possible_covid_deaths, None);
        assert_eq!(rows[1].period.as_date_string(), "2021-03-01");
        assert!(rows.iter().all(|r| r.region_code.is_none()));
        Ok(())
    }

    #[test]
    fn test_summary_rows_are_dropped() -> Result<()> {
        let reference = ReferenceTables::from_json_str(SAMPLE)?;
        let rows = normalize_rows(
            table(vec![
                raw(2, Data::String("Российская Федерация".into()), Data::Float(1.0)),
                raw(3, Data::String("Центральный федеральный округ".into()), Data::Float(1.0)),
                raw(4, Data::String("Белгородская область".into()), Data::Float(1.0)),
            ]),
            Period::new(3, 2021).unwrap(),
            &reference,
        )?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].normalized_key, "БЕЛГОРОДСКАЯОБЛАСТЬ");
        Ok(())
    }

    #[test]
    fn test_blank_subjects_are_dropped() -> Result<()> {
        let reference = ReferenceTables::from_json_str(SAMPLE)?;
        let rows = normalize_rows(
            table(vec![
                raw(3, Data::Empty, Data::Empty),
                raw(4, Data::String("   ".into()), Data::Empty),
            ]),
            Period::new(3, 2021).unwrap(),
            &reference,
        )?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_non_numeric_metric_fails() -> Result<()> {
        let reference = ReferenceTables::from_json_str(SAMPLE)?;
        let err = normalize_rows(
            table(vec![raw(
                7,
                Data::String("Брянская область".into()),
                Data::String("-".into()),
            )]),
            Period::new(3, 2021).unwrap(),
            &reference,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 8"), "{msg}");
        assert!(msg.contains("total_deaths"), "{msg}");
        Ok(())
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&Data::Empty), Ok(None));
        assert_eq!(coerce_number(&Data::Int(3)), Ok(Some(3.0)));
        assert_eq!(coerce_number(&Data::String("2.5".into())), Ok(Some(2.5)));
        assert_eq!(coerce_number(&Data::String("  ".into())), Ok(None));
        assert_eq!(coerce_number(&Data::Bool(true)), Ok(Some(1.0)));
        assert!(coerce_number(&Data::String("1 204".into())).is_err());
        assert!(coerce_number(&Data::String("n/a".into())).is_err());
    }
}
