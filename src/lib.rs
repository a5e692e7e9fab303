//! Spreadsheet-backed PC-parts catalog core.
//!
//! Two pieces do the real work: a generic section scanner that lifts (name, price)
//! tables out of an unstructured sheet export ([`parser`]), and a CPU/motherboard
//! generation-matching heuristic ([`compat`]). The rest is the plumbing a catalog
//! host needs: the grid model, the per-category catalog projection, selections and
//! totals, and a refresh-after-N-seconds cache over a pluggable grid source.

pub mod catalog;
pub mod compat;
pub mod grid;
pub mod parser;
pub mod selection;
pub mod source;

pub use catalog::{Catalog, CatalogItem, Category};
pub use compat::{filter_compatible_boards, is_compatible};
pub use grid::Grid;
pub use selection::Selection;
pub use source::{CatalogCache, CsvFileSource, GridSource, Snapshot};
