use tracing::{debug, warn};

use crate::catalog::CatalogItem;
use crate::grid::{is_blank, Grid};

use super::spec::{ColumnScan, MarkerMatch, SectionSpec, Terminator};

/// Items for the spec's section, in sheet row order. Empty when the marker
/// never appears or the grid is empty.
pub fn extract(grid: &Grid, spec: &SectionSpec) -> Vec<CatalogItem> {
    find_section(grid, spec).unwrap_or_default()
}

/// Like [`extract`], but distinguishes an absent marker (`None`) from a
/// present-but-empty section. Layered spec tables key their fallback on
/// this distinction.
pub fn find_section(grid: &Grid, spec: &SectionSpec) -> Option<Vec<CatalogItem>> {
    if grid.is_empty() {
        return None;
    }

    let (start, end) = match &spec.within {
        Some(parent) => parent_range(grid, parent, spec.scan)?,
        None => (0, grid.row_count()),
    };
    let (marker_row, marker_col) = find_marker(grid, &spec.marker, spec.scan, start, end)?;

    let name_col = marker_col + spec.name_offset;
    let price_col = name_col + spec.price_offset;
    let mut items = Vec::new();
    let mut rows_walked = 0usize;

    // The marker row itself never yields an item.
    for row in marker_row + 1..end {
        let guard = grid.cell(row, marker_col);
        let stop = match spec.until {
            Terminator::AfterRows(n) => rows_walked == n,
            ref until => until.stops(guard),
        };
        if stop {
            break;
        }
        rows_walked += 1;

        match parse_item(grid.cell(row, name_col), grid.cell(row, price_col)) {
            Some(item) => items.push(item),
            None => debug!("skipping row {}: no parsable name/price pair", row),
        }
    }

    Some(items)
}

/// Row-major search for the first cell announcing the marker. Later
/// occurrences are ignored with a warning so sheet authors can spot the
/// ambiguity instead of silently losing a section.
fn find_marker(
    grid: &Grid,
    marker: &MarkerMatch,
    scan: ColumnScan,
    start: usize,
    end: usize,
) -> Option<(usize, usize)> {
    let mut first: Option<(usize, usize)> = None;
    for row in start..end {
        let (lo, hi) = match scan {
            ColumnScan::Fixed(col) => (col, col + 1),
            ColumnScan::All => (0, grid.col_count(row)),
        };
        for col in lo..hi {
            if marker.matches(grid.cell(row, col)) {
                match first {
                    None => first = Some((row, col)),
                    Some((r, c)) => warn!(
                        "duplicate marker at row {}, col {}; keeping first at row {}, col {}",
                        row, col, r, c
                    ),
                }
            }
        }
    }
    first
}

/// Rows owned by a parent marker: from the row after it until the first
/// fully blank row or the end of the grid.
fn parent_range(grid: &Grid, parent: &MarkerMatch, scan: ColumnScan) -> Option<(usize, usize)> {
    let (row, _) = find_marker(grid, parent, scan, 0, grid.row_count())?;
    let start = row + 1;
    let end = (start..grid.row_count())
        .find(|&r| grid.row_is_blank(r))
        .unwrap_or(grid.row_count());
    Some((start, end))
}

/// Build an item from a (name, price) cell pair. Price text may carry `$`
/// and thousands separators; the value is rounded to the nearest unit.
/// Blank names and prices that fail to parse or round to zero or below
/// yield `None`.
fn parse_item(name: &str, price: &str) -> Option<CatalogItem> {
    let name = name.trim();
    if is_blank(name) {
        return None;
    }
    let cleaned = price.replace(['$', ','], "");
    let value: f64 = cleaned.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    if rounded <= 0.0 {
        return None;
    }
    Some(CatalogItem {
        name: name.to_string(),
        price: rounded as u32,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::spec::{self, ColumnScan, MarkerMatch, SectionSpec, Terminator};

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn header_spec(labels: &'static [&'static str]) -> SectionSpec {
        SectionSpec {
            marker: MarkerMatch::AnyOf(labels),
            scan: ColumnScan::All,
            name_offset: 0,
            price_offset: 1,
            until: Terminator::Blank,
            within: None,
        }
    }

    #[test]
    fn empty_grid_yields_nothing() {
        let spec = header_spec(&["PROCESSORS"]);
        assert!(extract(&Grid::default(), &spec).is_empty());
        assert!(find_section(&Grid::default(), &spec).is_none());
    }

    #[test]
    fn missing_marker_yields_nothing() {
        let g = grid(&[&["GPUS", ""], &["RTX 3060", "290"]]);
        let spec = header_spec(&["PROCESSORS"]);
        assert!(extract(&g, &spec).is_empty());
        assert!(find_section(&g, &spec).is_none());
    }

    #[test]
    fn present_but_empty_section_is_some() {
        let g = grid(&[&["PROCESSORS", ""], &["", ""]]);
        let spec = header_spec(&["PROCESSORS"]);
        assert_eq!(find_section(&g, &spec), Some(vec![]));
    }

    #[test]
    fn items_come_back_in_row_order() {
        let g = grid(&[
            &["PROCESSORS", ""],
            &["Intel i3-12100", "120"],
            &["Intel i5-12400", "180"],
            &["Intel i7-12700", "320"],
            &["", ""],
            &["Stray part", "999"],
        ]);
        let items = extract(&g, &header_spec(&["PROCESSORS"]));
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Intel i3-12100", "Intel i5-12400", "Intel i7-12700"]);
    }

    fn tag_spec(keyword: &'static str) -> SectionSpec {
        SectionSpec {
            marker: MarkerMatch::Tag(keyword),
            scan: ColumnScan::Fixed(0),
            name_offset: 1,
            price_offset: 1,
            until: Terminator::NextTag,
            within: None,
        }
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let g = grid(&[
            &["table_cpu", "", ""],
            &["1", "Intel i3-12100", "120"],
            &["2", "nan", "75"],
            &["3", "Pentium G6400", "n/a"],
            &["4", "Celeron G5905", "0"],
            &["5", "Athlon 3000G", "-45"],
            &["6", "Intel i5-12400", "180"],
        ]);
        let items = extract(&g, &tag_spec("cpu"));
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Intel i3-12100", "Intel i5-12400"]);
    }

    #[test]
    fn price_normalization_is_idempotent() {
        let g = grid(&[
            &["PROCESSORS", ""],
            &["A", "$1,299"],
            &["B", "1299"],
            &["C", "1299.4"],
        ]);
        let items = extract(&g, &header_spec(&["PROCESSORS"]));
        assert_eq!(items[0].price, 1299);
        assert_eq!(items[1].price, 1299);
        assert_eq!(items[2].price, 1299);
    }

    #[test]
    fn single_blank_cell_ends_unconditionally() {
        // No lookahead: valid rows after the blank stay out.
        let g = grid(&[
            &["PROCESSORS", ""],
            &["Intel i3-12100", "120"],
            &["", ""],
            &["Intel i5-12400", "180"],
        ]);
        let items = extract(&g, &header_spec(&["PROCESSORS"]));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn next_tag_ends_tag_sections() {
        let g = grid(&[
            &["table_cpu", "", ""],
            &["1", "Intel i3-12100", "120"],
            &["2", "Intel i5-12400", "180"],
            &["table_mb", "", ""],
            &["1", "MSI H610M", "85"],
        ]);
        let items = extract(&g, &tag_spec("cpu"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Intel i5-12400");
    }

    #[test]
    fn first_marker_wins_row_major() {
        let g = grid(&[
            &["", "PROCESSORS"],
            &["", "Intel i3-12100", "120"],
            &["", ""],
            &["PROCESSORS", ""],
            &["Refurb i3-10100", "70"],
        ]);
        let items = extract(&g, &header_spec(&["PROCESSORS"]));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Intel i3-12100");
    }

    #[test]
    fn after_rows_counts_traversed_rows() {
        // Skipped rows count toward the region's extent.
        let g = grid(&[
            &["PROCESSORS", ""],
            &["Intel i3-12100", "120"],
            &["broken", "n/a"],
            &["Intel i5-12400", "180"],
            &["Intel i7-12700", "320"],
        ]);
        let mut spec = header_spec(&["PROCESSORS"]);
        spec.until = Terminator::AfterRows(3);
        let items = extract(&g, &spec);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Intel i3-12100", "Intel i5-12400"]);
    }

    #[test]
    fn sub_marker_scans_only_parent_rows() {
        let text = std::fs::read_to_string("tests/fixtures/memory.csv").unwrap();
        let g = Grid::from_csv(&text).unwrap();
        let ddr4 = extract(&g, &spec::memory(crate::catalog::MemoryKind::Ddr4));
        let names: Vec<&str> = ddr4.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Corsair Vengeance LPX 8GB",
                "Kingston Fury Beast 16GB",
                "TeamGroup Vulcan Z 16GB"
            ]
        );
    }

    #[test]
    fn sibling_sub_marker_ends_sub_table() {
        let text = std::fs::read_to_string("tests/fixtures/memory.csv").unwrap();
        let g = Grid::from_csv(&text).unwrap();
        let ddr3 = extract(&g, &spec::memory(crate::catalog::MemoryKind::Ddr3));
        let ddr5 = extract(&g, &spec::memory(crate::catalog::MemoryKind::Ddr5));
        assert_eq!(ddr3.len(), 2);
        assert_eq!(ddr5.len(), 2);
        assert!(ddr5.iter().all(|i| i.name.contains("DDR5")));
    }

    #[test]
    fn missing_parent_yields_nothing() {
        let g = grid(&[&["DDR4", ""], &["Kingston Fury 16GB", "90"]]);
        let items = extract(&g, &spec::memory(crate::catalog::MemoryKind::Ddr4));
        assert!(items.is_empty());
    }
}
