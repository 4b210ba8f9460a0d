//! Legacy template format detection.

use regex::Regex;
use serde::Serialize;

use crate::cell::CellGrid;

/// Rows × columns of the region inspected for old/new indicator phrases.
const SCAN_ROWS: usize = 5;
const SCAN_COLS: usize = 10;

/// The three known legacy template generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyFormat {
    /// Cart # / Media / Ri at fixed cells, PV1-PV5 pressure columns.
    Cart,
    /// Split Project/Sample fields, Ri/Rf resistance pair.
    Old,
    /// Sample ID and a single Resistance field.
    New,
    /// Indicators tied; converted with the default (new-style) extraction.
    Unknown,
}

impl std::fmt::Display for LegacyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cart => write!(f, "cart"),
            Self::Old => write!(f, "old"),
            Self::New => write!(f, "new"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify a worksheet grid as one of the known legacy formats.
///
/// The cart check looks at fixed cells (A2, A3, C2); old vs new is decided
/// by counting indicator phrases over the top-left scan region, strict
/// majority winning. Pure function of the grid; ambiguity is `Unknown`,
/// never an error.
pub fn detect_format(grid: &CellGrid) -> LegacyFormat {
    if is_cart_format(grid) {
        return LegacyFormat::Cart;
    }

    let old_res = Regex::new(r"(?i)ri\s*\(\s*ohms?\s*\)").unwrap();
    let old_res_final = Regex::new(r"(?i)rf\s*\(\s*ohms?\s*\)").unwrap();
    let old_project = Regex::new(r"(?i)project\s*:").unwrap();
    let new_sample = Regex::new(r"(?i)sample\s*(id|name)\s*:").unwrap();
    let new_resistance = Regex::new(r"(?i)resistance\s*\(\s*ohms?\s*\)\s*:").unwrap();

    let mut old_indicators = 0;
    let mut new_indicators = 0;

    for row in 0..SCAN_ROWS.min(grid.nrows()) {
        for col in 0..SCAN_COLS.min(grid.ncols()) {
            let text = grid.text(row, col);
            if text.is_empty() {
                continue;
            }

            if old_project.is_match(&text) {
                old_indicators += 1;
            }
            if old_res.is_match(&text) {
                old_indicators += 1;
            }
            if old_res_final.is_match(&text) {
                old_indicators += 1;
            }

            if new_sample.is_match(&text) {
                new_indicators += 1;
            }
            // "Resistance (Ohms):" counts for the new format only when the
            // cell isn't also an Ri/Rf spelling.
            let lower = text.to_lowercase();
            if new_resistance.is_match(&text) && !lower.contains("ri") && !lower.contains("rf") {
                new_indicators += 1;
            }
        }
    }

    if old_indicators > new_indicators {
        LegacyFormat::Old
    } else if new_indicators > old_indicators {
        LegacyFormat::New
    } else {
        LegacyFormat::Unknown
    }
}

/// Cart format check: "Cart #" in A2, "Media" in A3, "Ri" in C2.
fn is_cart_format(grid: &CellGrid) -> bool {
    if grid.nrows() <= 3 || grid.ncols() <= 8 {
        return false;
    }
    let cart = Regex::new(r"(?i)cart\s*#").unwrap();
    let a2 = grid.text(1, 0);
    let a3 = grid.text(2, 0).to_lowercase();
    let c2 = grid.text(1, 2).to_lowercase();
    cart.is_match(&a2) && a3.contains("media") && c2.contains("ri")
}
