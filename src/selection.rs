use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, Category};

/// One chosen item per category; categories without a pick are absent.
///
/// Selections are explicit values passed around by the host, not ambient
/// state the core reads. Serializable so share links and quote exports can
/// round-trip them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    choices: BTreeMap<Category, CatalogItem>,
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    /// Pick an item for a category, replacing any earlier pick.
    pub fn choose(&mut self, category: Category, item: CatalogItem) {
        self.choices.insert(category, item);
    }

    pub fn clear(&mut self, category: Category) {
        self.choices.remove(&category);
    }

    pub fn chosen(&self, category: Category) -> Option<&CatalogItem> {
        self.choices.get(&category)
    }

    /// Picks in category declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CatalogItem)> {
        self.choices.iter().map(|(c, i)| (*c, i))
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Sum of the chosen items' prices.
    pub fn total_price(&self) -> u64 {
        self.choices.values().map(|item| u64::from(item.price)).sum()
    }
}

// ── Tests ──
