use anyhow::Result;

/// Raw rectangular cell data fetched from the tabular source.
///
/// Rows may be ragged; out-of-range addresses read as empty. A grid is immutable
/// for the duration of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Grid { rows }
    }

    /// Decode a headerless CSV export, keeping sheet row order.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Grid { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Cell text at (row, col); out-of-range reads as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when every cell in the row is blank (also true past the last row).
    pub fn row_is_blank(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_none_or(|r| r.iter().all(|c| is_blank(c)))
    }
}

/// Blank-cell rule: empty after trimming, or the stringified missing value `nan`
/// that sheet exports carry for empty cells.
pub fn is_blank(cell: &str) -> bool {
    let t = cell.trim();
    t.is_empty() || t.eq_ignore_ascii_case("nan")
}
