//! The catalog extractor: declarative section specs interpreted by one
//! generic scanning routine.

pub mod scan;
pub mod spec;

pub use scan::{extract, find_section};
pub use spec::{ColumnScan, MarkerMatch, SectionSpec, Terminator};
