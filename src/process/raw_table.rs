use calamine::{Data, Range};

static EMPTY: Data = Data::Empty;

/// A worksheet as a dense grid anchored at A1, so column indices match sheet columns
/// even when the used range starts further in.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Data>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Copy a calamine range, padding the leading empty rows/columns it omits.
    pub fn from_range(name: impl Into<String>, range: &Range<Data>) -> Self {
        let (row0, col0) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<Data>> = vec![Vec::new(); row0 as usize];
        for row in range.rows() {
            let mut cells = vec![Data::Empty; col0 as usize];
            cells.extend(row.iter().cloned());
            rows.push(cells);
        }
        Self::new(name, rows)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (row, col); anything outside the grid reads as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Data {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

/// One row of the extracted block, columns already picked by the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 0-based sheet row, kept for diagnostics.
    pub sheet_row: usize,
    pub subject: Data,
    pub total_deaths: Data,
    pub confirmed_covid_deaths: Data,
    pub possible_covid_deaths: Data,
}

/// The block between the anchor row and the footnote (or end of sheet).
#[derive(Debug, Clone)]
pub struct RawTable {
    pub layout_name: &'static str,
    pub rows: Vec<RawRow>,
}
