use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Reader};
use std::path::Path;
use tracing::debug;

use super::raw_table::RawSheet;

/// Historical spellings of the COVID mortality form's sheet name.
pub const FORM_SHEET_MARKERS: [&str; 2] = ["5.1", "5_1"];

/// First sheet whose name contains one of the form markers.
///
/// When several sheets match only the first one is used.
pub fn locate_sheet<S: AsRef<str>>(names: &[S]) -> Option<&str> {
    names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| FORM_SHEET_MARKERS.iter().any(|m| name.contains(m)))
}

/// Open `path` and materialise the form sheet only.
///
/// `Ok(None)` means the workbook has no matching sheet; `Err` means it could not be read.
pub fn read_form_sheet<P: AsRef<Path>>(path: P) -> Result<Option<RawSheet>> {
    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening workbook {:?}", path))?;

    let names = workbook.sheet_names();
    debug!(sheets = ?names, "workbook sheets");
    let Some(name) = locate_sheet(&names).map(str::to_string) else {
        return Ok(None);
    };

    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("reading sheet `{}` of {:?}", name, path))?;
    Ok(Some(RawSheet::from_range(name, &range)))
}
