use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::parser::{scan, spec};

/// A hardware class. Declaration order is the catalog's presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    #[serde(rename = "mb")]
    Motherboard,
    Ram,
    Gpu,
    Case,
    Psu,
    Cooler,
    Storage,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Ram,
        Category::Gpu,
        Category::Case,
        Category::Psu,
        Category::Cooler,
        Category::Storage,
    ];

    /// Stable key used by share links and the CLI.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Motherboard => "mb",
            Category::Ram => "ram",
            Category::Gpu => "gpu",
            Category::Case => "case",
            Category::Psu => "psu",
            Category::Cooler => "cooler",
            Category::Storage => "storage",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        match key.trim().to_ascii_lowercase().as_str() {
            "cpu" => Some(Category::Cpu),
            "mb" | "motherboard" => Some(Category::Motherboard),
            "ram" => Some(Category::Ram),
            "gpu" => Some(Category::Gpu),
            "case" => Some(Category::Case),
            "psu" => Some(Category::Psu),
            "coo" | "cooler" => Some(Category::Cooler),
            "storage" => Some(Category::Storage),
            _ => None,
        }
    }

    /// Keyword in the sheet's `table_<keyword>` tags. The source sheets
    /// abbreviate cooler to `coo`.
    pub(crate) fn tag_keyword(&self) -> &'static str {
        match self {
            Category::Cooler => "coo",
            other => other.key(),
        }
    }

    /// Header labels the fallback layout announces a section with.
    pub(crate) fn header_labels(&self) -> &'static [&'static str] {
        match self {
            Category::Cpu => &["PROCESSORS", "CPUS"],
            Category::Motherboard => &["MOTHERBOARDS", "MAINBOARDS"],
            Category::Ram => &["RAMS", "MEMORY"],
            Category::Gpu => &["GRAPHICS CARDS", "GPUS"],
            Category::Case => &["CASES"],
            Category::Psu => &["POWER SUPPLIES", "PSUS"],
            Category::Cooler => &["COOLERS", "CPU COOLERS"],
            Category::Storage => &["STORAGE", "DRIVES"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One purchasable part: a display name and a unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub price: u32,
}

/// DDR sub-tables nested under the RAM section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryKind {
    Ddr3,
    Ddr4,
    Ddr5,
}

impl MemoryKind {
    pub const ALL: [MemoryKind; 3] = [MemoryKind::Ddr3, MemoryKind::Ddr4, MemoryKind::Ddr5];

    pub(crate) fn labels(&self) -> &'static [&'static str] {
        match self {
            MemoryKind::Ddr3 => &["DDR3"],
            MemoryKind::Ddr4 => &["DDR4"],
            MemoryKind::Ddr5 => &["DDR5"],
        }
    }

    pub fn from_key(key: &str) -> Option<MemoryKind> {
        match key.trim().to_ascii_lowercase().as_str() {
            "ddr3" => Some(MemoryKind::Ddr3),
            "ddr4" => Some(MemoryKind::Ddr4),
            "ddr5" => Some(MemoryKind::Ddr5),
            _ => None,
        }
    }
}

/// Per-category item tables projected from one grid.
///
/// A pure projection: rebuilt whenever the grid is reloaded, never patched
/// in place.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: BTreeMap<Category, Vec<CatalogItem>>,
}

impl Catalog {
    /// Run every category's section spec against the grid. The tag layout
    /// is tried first; the header layout only when the tag marker is
    /// absent.
    pub fn from_grid(grid: &Grid) -> Catalog {
        let mut tables = BTreeMap::new();
        for category in Category::ALL {
            let items = scan::find_section(grid, &spec::preferred(category))
                .or_else(|| scan::find_section(grid, &spec::fallback(category)))
                .unwrap_or_default();
            tables.insert(category, items);
        }
        Catalog { tables }
    }

    /// Category keys in fixed declaration order.
    pub fn categories() -> &'static [Category] {
        &Category::ALL
    }

    pub fn items(&self, category: Category) -> &[CatalogItem] {
        self.tables.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Total number of items across all categories.
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Items of one DDR sub-table nested under the RAM section.
pub fn memory_items(grid: &Grid, kind: MemoryKind) -> Vec<CatalogItem> {
    scan::extract(grid, &spec::memory(kind))
}

// ── Tests ──
