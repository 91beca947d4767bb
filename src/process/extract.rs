// src/process/extract.rs

use tracing::debug;

use super::period::Period;
use super::raw_table::{RawRow, RawSheet, RawTable};
use super::utils::cell_contains;
use super::SkipReason;

/// First-column text of the table's first row (the national total).
pub const ANCHOR_TEXT: &str = "Российская Федерация";
/// First-column text of the footnote block that follows the table.
pub const FOOTNOTE_TEXT: &str = "Информация";

/// Which sheet columns hold subject, total, confirmed and possible deaths.
#[derive(Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: &'static str,
    /// First period this layout applies to; `None` = since the first release.
    pub since: Option<Period>,
    pub columns: [usize; 4],
}

/// Known layouts, oldest first.
///
/// From 05.2021 every metric is printed for the current and the previous year with a
/// percentage column after each pair; only the current-year columns are taken.
pub static LAYOUTS: [ColumnLayout; 2] = [
    ColumnLayout {
        name: "single-year",
        since: None,
        columns: [0, 1, 2, 3],
    },
    ColumnLayout {
        name: "two-year",
        since: Some(Period {
            year: 2021,
            month: 5,
        }),
        columns: [0, 1, 4, 7],
    },
];

/// The newest layout whose start is not after `period`.
pub fn layout_for(period: Period) -> &'static ColumnLayout {
    LAYOUTS
        .iter()
        .rev()
        .find(|l| l.since.map_or(true, |since| since <= period))
        .unwrap_or(&LAYOUTS[0])
}

/// Row index of the first row whose first cell mentions the national total.
pub fn find_anchor(sheet: &RawSheet) -> Option<usize> {
    (0..sheet.height()).find(|&r| cell_contains(sheet.cell(r, 0), ANCHOR_TEXT))
}

/// Row index of the first footnote row strictly after `anchor`.
pub fn find_footnote(sheet: &RawSheet, anchor: usize) -> Option<usize> {
    (anchor + 1..sheet.height()).find(|&r| cell_contains(sheet.cell(r, 0), FOOTNOTE_TEXT))
}

/// Slice rows `[anchor, footnote)` and the period's columns out of `sheet`.
pub fn extract_table(sheet: &RawSheet, period: Period) -> Result<RawTable, SkipReason> {
    let start = find_anchor(sheet).ok_or(SkipReason::AnchorNotFound)?;
    let end = find_footnote(sheet, start).unwrap_or_else(|| sheet.height());
    let layout = layout_for(period);
    debug!(
        sheet = %sheet.name,
        start,
        end,
        layout = layout.name,
        "table bounds"
    );

    let [subject, total, confirmed, possible] = layout.columns;
    let rows = (start..end)
        .map(|r| RawRow {
            sheet_row: r,
            subject: sheet.cell(r, subject).clone(),
            total_deaths: sheet.cell(r, total).clone(),
            confirmed_covid_deaths: sheet.cell(r, confirmed).clone(),
            possible_covid_deaths: sheet.cell(r, possible).clone(),
        })
        .collect();

    Ok(RawTable {
        layout_name: layout.name,
        rows,
    })
}
