use crate::catalog::{Category, MemoryKind};
use crate::grid::is_blank;

/// How a marker cell is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMatch {
    /// Case-insensitive equality against any label of a closed set.
    AnyOf(&'static [&'static str]),
    /// Substring match on the `table_<keyword>` tag convention.
    Tag(&'static str),
}

impl MarkerMatch {
    /// True when the normalized cell announces this marker.
    pub fn matches(&self, cell: &str) -> bool {
        let norm = cell.trim().to_ascii_lowercase();
        match self {
            MarkerMatch::AnyOf(labels) => {
                labels.iter().any(|label| norm == label.to_ascii_lowercase())
            }
            MarkerMatch::Tag(keyword) => {
                norm.contains(&format!("table_{}", keyword.to_ascii_lowercase()))
            }
        }
    }
}

/// Where to look for markers and item names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnScan {
    /// One fixed column index.
    Fixed(usize),
    /// Any column; markers may appear anywhere in a row.
    All,
}

/// When a section's data rows end. Every rule except `AfterRows` is
/// evaluated against the marker-column cell of each row.
#[derive(Debug, Clone, Copy)]
pub enum Terminator {
    /// A single blank cell ends the section, no lookahead.
    Blank,
    /// A blank cell or any `table_*` tag.
    NextTag,
    /// A blank cell or any marker from a closed set.
    AnyMarker(&'static [&'static str]),
    /// A fixed count of data rows, counted by the scanner.
    AfterRows(usize),
}

impl Terminator {
    /// True when this guard cell ends the section. `AfterRows` never
    /// triggers here; the scanner counts rows itself.
    pub fn stops(&self, cell: &str) -> bool {
        match self {
            Terminator::Blank => is_blank(cell),
            Terminator::NextTag => {
                is_blank(cell) || cell.trim().to_ascii_lowercase().contains("table_")
            }
            Terminator::AnyMarker(labels) => {
                is_blank(cell) || MarkerMatch::AnyOf(labels).matches(cell)
            }
            Terminator::AfterRows(_) => false,
        }
    }
}

/// One section of the sheet, described declaratively: what announces it,
/// where to look, where the name and price cells sit relative to the
/// marker, and what ends it. A single generic scan routine interprets
/// these; no category gets its own parsing function.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub marker: MarkerMatch,
    pub scan: ColumnScan,
    /// Name column, as an offset from the marker column.
    pub name_offset: usize,
    /// Price column, as an offset from the name column.
    pub price_offset: usize,
    pub until: Terminator,
    /// Restricts the scan to the row range owned by a parent marker.
    pub within: Option<MarkerMatch>,
}

/// Preferred layout: `table_<keyword>` tags in column 0, item names in
/// column 1, prices in column 2. The next tag or a blank cell ends the
/// section.
pub fn preferred(category: Category) -> SectionSpec {
    SectionSpec {
        marker: MarkerMatch::Tag(category.tag_keyword()),
        scan: ColumnScan::Fixed(0),
        name_offset: 1,
        price_offset: 1,
        until: Terminator::NextTag,
        within: None,
    }
}

/// Fallback layout: a named header anywhere in the grid, item names below
/// it in the same column, prices one column to the right, first blank cell
/// ends the section.
pub fn fallback(category: Category) -> SectionSpec {
    SectionSpec {
        marker: MarkerMatch::AnyOf(category.header_labels()),
        scan: ColumnScan::All,
        name_offset: 0,
        price_offset: 1,
        until: Terminator::Blank,
        within: None,
    }
}

const MEMORY_MARKERS: &[&str] = &["DDR3", "DDR4", "DDR5"];

/// DDR sub-tables nested inside the RAM section: the sub-marker is searched
/// only within the rows owned by the RAM parent marker, and a sibling
/// sub-marker ends the sub-table.
pub fn memory(kind: MemoryKind) -> SectionSpec {
    SectionSpec {
        marker: MarkerMatch::AnyOf(kind.labels()),
        scan: ColumnScan::All,
        name_offset: 0,
        price_offset: 1,
        until: Terminator::AnyMarker(MEMORY_MARKERS),
        within: Some(MarkerMatch::AnyOf(Category::Ram.header_labels())),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_substring_and_case_insensitive() {
        let marker = MarkerMatch::Tag("cpu");
        assert!(marker.matches("table_cpu"));
        assert!(marker.matches("  TABLE_CPU (main)  "));
        assert!(!marker.matches("table_gpu"));
        assert!(!marker.matches("cpu"));
    }

    #[test]
    fn alias_is_exact_equality() {
        let marker = MarkerMatch::AnyOf(&["PROCESSORS", "CPUS"]);
        assert!(marker.matches("processors"));
        assert!(marker.matches(" Cpus "));
        assert!(!marker.matches("PROCESSORS LIST"));
    }

    #[test]
    fn blank_terminator() {
        assert!(Terminator::Blank.stops(""));
        assert!(Terminator::Blank.stops(" nan "));
        assert!(!Terminator::Blank.stops("Intel i5"));
    }

    #[test]
    fn next_tag_terminator() {
        assert!(Terminator::NextTag.stops("table_mb"));
        assert!(Terminator::NextTag.stops("TABLE_GPU"));
        assert!(Terminator::NextTag.stops(""));
        assert!(!Terminator::NextTag.stops("Intel i5"));
    }

    #[test]
    fn any_marker_terminator() {
        let until = Terminator::AnyMarker(&["DDR3", "DDR4", "DDR5"]);
        assert!(until.stops("ddr5"));
        assert!(until.stops(""));
        assert!(!until.stops("Kingston Fury 16GB"));
    }

    #[test]
    fn after_rows_never_stops_on_cells() {
        assert!(!Terminator::AfterRows(0).stops(""));
        assert!(!Terminator::AfterRows(3).stops("table_mb"));
    }
}
