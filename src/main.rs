use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use buildsheet::catalog::{memory_items, Category, MemoryKind};
use buildsheet::compat::{filter_compatible_boards, is_compatible};
use buildsheet::selection::Selection;
use buildsheet::source::{CatalogCache, CsvFileSource};
use buildsheet::CatalogItem;

#[derive(Parser)]
#[command(name = "buildsheet", about = "PC-parts catalog over a spreadsheet export")]
struct Cli {
    /// CSV export of the parts sheet
    #[arg(short, long, default_value = "parts.csv")]
    sheet: PathBuf,

    /// Seconds before the cached sheet is re-read
    #[arg(long, default_value = "300")]
    refresh: u64,

    /// Emit JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories and their item counts
    Categories,
    /// List the items of one category
    Items {
        /// Category key (cpu, mb, ram, gpu, case, psu, cooler, storage)
        category: String,
        /// Restrict RAM to one DDR sub-table (ddr3, ddr4, ddr5)
        #[arg(long)]
        ddr: Option<String>,
    },
    /// Motherboards compatible with a chosen CPU
    Boards {
        /// CPU display name as listed in the catalog
        cpu: String,
    },
    /// Check one CPU/board pair
    Check { cpu: String, board: String },
    /// Price a build from category=name picks
    Quote {
        /// Picks as category=name, e.g. 'cpu=Intel Core i7-12700'
        picks: Vec<String>,
    },
    /// Sheet and catalog statistics
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let cache = CatalogCache::new(
        CsvFileSource::new(&cli.sheet),
        Duration::from_secs(cli.refresh),
    );
    let snap = cache.snapshot()?;

    match cli.command {
        Commands::Categories => {
            if cli.json {
                let counts: Vec<_> = Category::ALL
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "key": c.key(),
                            "items": snap.catalog.items(*c).len(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                println!("{:<10} {:>5}", "Category", "Items");
                for category in Category::ALL {
                    println!(
                        "{:<10} {:>5}",
                        category.key(),
                        snap.catalog.items(category).len()
                    );
                }
                for category in Category::ALL {
                    if snap.catalog.items(category).is_empty() {
                        println!(
                            "note: no data for '{}' (no section marker in the sheet)",
                            category.key()
                        );
                    }
                }
            }
        }
        Commands::Items { category, ddr } => {
            let (label, items): (String, Vec<CatalogItem>) = match ddr {
                Some(key) => {
                    let kind = MemoryKind::from_key(&key)
                        .with_context(|| format!("unknown DDR kind '{}'", key))?;
                    (key, memory_items(&snap.grid, kind))
                }
                None => {
                    let cat = Category::from_key(&category)
                        .with_context(|| format!("unknown category '{}'", category))?;
                    (category, snap.catalog.items(cat).to_vec())
                }
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!(
                    "No data for '{}': section marker not found in the sheet.",
                    label
                );
            } else {
                print_items(&items);
            }
        }
        Commands::Boards { cpu } => {
            let all = snap.catalog.items(Category::Motherboard);
            let boards = filter_compatible_boards(&cpu, all);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&boards)?);
            } else if boards.is_empty() {
                println!("No compatible boards for '{}' ({} listed).", cpu, all.len());
            } else {
                print_items(&boards);
            }
        }
        Commands::Check { cpu, board } => {
            let ok = is_compatible(&cpu, &board);
            if cli.json {
                println!("{}", serde_json::json!({ "compatible": ok }));
            } else if ok {
                println!("'{}' works with '{}'", cpu, board);
            } else {
                println!("'{}' does not list the generation of '{}'", board, cpu);
            }
        }
        Commands::Quote { picks } => {
            let mut selection = Selection::new();
            for pick in &picks {
                let (key, name) = pick
                    .split_once('=')
                    .with_context(|| format!("pick '{}' is not category=name", pick))?;
                let category = Category::from_key(key)
                    .with_context(|| format!("unknown category '{}'", key))?;
                let name = name.trim();
                let item = snap
                    .catalog
                    .items(category)
                    .iter()
                    .find(|i| i.name.eq_ignore_ascii_case(name))
                    .with_context(|| {
                        format!("no '{}' item named '{}' in the sheet", category.key(), name)
                    })?;
                selection.choose(category, item.clone());
            }

            if cli.json {
                let total = selection.total_price();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "selection": selection,
                        "total": total,
                    }))?
                );
            } else {
                for (category, item) in selection.iter() {
                    println!(
                        "{:<8} {:<44} {:>8}",
                        category.key(),
                        truncate(&item.name, 44),
                        item.price
                    );
                }
                println!("{}", "-".repeat(62));
                println!("{:<8} {:<44} {:>8}", "total", "", selection.total_price());

                if let (Some(cpu), Some(board)) = (
                    selection.chosen(Category::Cpu),
                    selection.chosen(Category::Motherboard),
                ) {
                    if !is_compatible(&cpu.name, &board.name) {
                        println!(
                            "warning: '{}' does not list generation support for '{}'",
                            board.name, cpu.name
                        );
                    }
                }
            }
        }
        Commands::Stats => {
            println!("Rows:    {}", snap.grid.row_count());
            println!("Items:   {}", snap.catalog.len());
            println!("Fetched: {}", snap.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));
            for category in Category::ALL {
                println!(
                    "  {:<8} {:>4}",
                    category.key(),
                    snap.catalog.items(category).len()
                );
            }
        }
    }

    Ok(())
}

fn print_items(items: &[CatalogItem]) {
    println!("{:>3} | {:<44} | {:>8}", "#", "Item", "Price");
    println!("{}", "-".repeat(61));
    for (i, item) in items.iter().enumerate() {
        println!(
            "{:>3} | {:<44} | {:>8}",
            i + 1,
            truncate(&item.name, 44),
            item.price
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
