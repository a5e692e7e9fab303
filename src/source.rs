use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::catalog::Catalog;
use crate::grid::Grid;

/// The tabular backend seam: anything that can produce a fresh grid.
pub trait GridSource {
    fn fetch(&self) -> Result<Grid>;
}

/// Reads a local CSV export of the sheet.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> CsvFileSource {
        CsvFileSource { path: path.into() }
    }
}

impl GridSource for CsvFileSource {
    fn fetch(&self) -> Result<Grid> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading sheet export {}", self.path.display()))?;
        Grid::from_csv(&text)
            .with_context(|| format!("decoding sheet export {}", self.path.display()))
    }
}

/// One immutable (grid, catalog, fetched-at) triple served by the cache.
#[derive(Debug)]
pub struct Snapshot {
    pub grid: Grid,
    pub catalog: Catalog,
    pub fetched_at: DateTime<Utc>,
}

/// Refresh-after-N-seconds cache over a grid source.
///
/// Readers always see one whole snapshot, old or new, never a partial one;
/// a refresh builds the replacement off to the side and swaps it in under
/// the write lock.
pub struct CatalogCache<S> {
    source: S,
    ttl: Duration,
    state: RwLock<Option<Cached>>,
}

struct Cached {
    taken: Instant,
    snapshot: Arc<Snapshot>,
}

impl<S: GridSource> CatalogCache<S> {
    pub fn new(source: S, ttl: Duration) -> CatalogCache<S> {
        CatalogCache {
            source,
            ttl,
            state: RwLock::new(None),
        }
    }

    /// Current snapshot, refreshing first if the TTL has lapsed.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        {
            let state = self.state.read().expect("cache lock poisoned");
            if let Some(cached) = state.as_ref() {
                if cached.taken.elapsed() < self.ttl {
                    return Ok(Arc::clone(&cached.snapshot));
                }
            }
        }
        self.refresh()
    }

    /// Re-fetch and swap unconditionally. On failure the previous snapshot
    /// stays in place and the fetch error goes to this caller.
    pub fn refresh(&self) -> Result<Arc<Snapshot>> {
        let grid = self.source.fetch()?;
        let snapshot = Arc::new(Snapshot {
            catalog: Catalog::from_grid(&grid),
            grid,
            fetched_at: Utc::now(),
        });
        info!(
            "sheet refreshed: {} rows, {} items",
            snapshot.grid.row_count(),
            snapshot.catalog.len()
        );
        let mut state = self.state.write().expect("cache lock poisoned");
        *state = Some(Cached {
            taken: Instant::now(),
            snapshot: Arc::clone(&snapshot),
        });
        Ok(snapshot)
    }

    /// Whatever the cache currently holds, fresh or stale.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.state
            .read()
            .expect("cache lock poisoned")
            .as_ref()
            .map(|cached| Arc::clone(&cached.snapshot))
    }
}

// ── Tests ──
