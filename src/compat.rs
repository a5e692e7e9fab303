//! CPU/motherboard pairing heuristic.
//!
//! Generations are inferred from display names: an Intel-style model number
//! on the CPU ("i7-12700" is generation 12) against a free-text parenthetical
//! on the board ("H610 (12,13,14)"). A naming convention, not a
//! hardware-compatibility database; whenever either side declares nothing
//! parseable, the pair passes.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::CatalogItem;

static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

/// Dropdown sentinel the UI layer shows before a real pick ("Select CPU",
/// "Select Motherboard", ...). Blank counts too.
fn is_placeholder(name: &str) -> bool {
    let lower = name.trim().to_ascii_lowercase();
    lower.is_empty() || lower == "select" || lower.starts_with("select ")
}

/// Generation inferred from a CPU display name: the first run of exactly 4
/// or 5 consecutive digits. Five digits keep their first two ("12700" →
/// "12"), four keep their first one ("6500" → "6"). Runs of other lengths
/// are skipped, not truncated.
pub fn cpu_generation(name: &str) -> Option<&str> {
    DIGIT_RUN_RE.find_iter(name).find_map(|m| {
        let run = m.as_str();
        match run.len() {
            5 => Some(&run[..2]),
            4 => Some(&run[..1]),
            _ => None,
        }
    })
}

/// Allowed generations declared in the first parenthetical of a board name.
/// `None` when the name carries no parenthetical, or one without any digit
/// runs, meaning no constraint is declared.
pub fn board_generations(name: &str) -> Option<HashSet<&str>> {
    let caps = PAREN_RE.captures(name)?;
    let inner = caps.get(1)?;
    let allowed: HashSet<&str> = DIGIT_RUN_RE
        .find_iter(inner.as_str())
        .map(|m| m.as_str())
        .collect();
    if allowed.is_empty() {
        None
    } else {
        Some(allowed)
    }
}

/// Placeholder CPUs pass every board, as does any pair where either side
/// declares no generation. Otherwise the CPU's generation must appear in
/// the board's allowed set.
pub fn is_compatible(cpu_name: &str, board_name: &str) -> bool {
    if is_placeholder(cpu_name) {
        return true;
    }
    let Some(generation) = cpu_generation(cpu_name) else {
        return true;
    };
    let Some(allowed) = board_generations(board_name) else {
        return true;
    };
    allowed.contains(generation)
}

/// Boards that pass the pairing check for `cpu_name`, in their original
/// order.
pub fn filter_compatible_boards(cpu_name: &str, boards: &[CatalogItem]) -> Vec<CatalogItem> {
    boards
        .iter()
        .filter(|board| is_compatible(cpu_name, &board.name))
        .cloned()
        .collect()
}

// ── Tests ──
