//! Anchor scanning: locating the "puffs" headers that start sample blocks.

use crate::cell::CellGrid;
use crate::claim::ClaimSet;
use crate::model::Anchor;
use crate::patterns::{header_matches, FieldCatalog};

/// Scanner knobs, derived from a format profile but overridable by the
/// caller (alignment enforcement in particular is a strictness flag, not an
/// invariant of the formats themselves).
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub block_width: usize,
    /// Same-row suppression distance.
    pub proximity: usize,
    /// Reject anchors whose column is not a multiple of `block_width`.
    pub require_alignment: bool,
}

impl ScanOptions {
    pub fn from_catalog(catalog: &FieldCatalog) -> Self {
        Self {
            block_width: catalog.block_width,
            proximity: catalog.proximity,
            require_alignment: catalog.require_alignment,
        }
    }
}

/// Scan the grid row-major for anchor headers.
///
/// Accepted anchors are claimed so later matches in the same row within the
/// proximity distance are suppressed. Output order is discovery order, which
/// becomes the preliminary sample index.
pub fn scan_anchors(
    grid: &CellGrid,
    catalog: &FieldCatalog,
    options: ScanOptions,
    claims: &mut ClaimSet,
) -> Vec<Anchor> {
    let mut anchors = Vec::new();

    for row in 0..grid.nrows() {
        for col in 0..grid.ncols() {
            if claims.near_in_row(row, col, options.proximity) {
                continue;
            }
            let text = grid.text(row, col);
            if !header_matches(&text, &catalog.anchor) {
                continue;
            }
            if options.require_alignment && col % options.block_width != 0 {
                continue;
            }
            claims.claim(row, col);
            anchors.push(Anchor { row, col });
        }
    }

    anchors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::patterns::{FieldCatalog, GENERIC, OLD};

    fn grid_with(cells: &[(usize, usize, &str)], nrows: usize, ncols: usize) -> CellGrid {
        let mut grid = CellGrid::new(nrows, ncols);
        for (row, col, text) in cells {
            grid.set(*row, *col, Cell::Text((*text).to_string()));
        }
        grid
    }

    #[test]
    fn anchors_found_in_discovery_order() {
        let grid = grid_with(&[(3, 12, "Puffs"), (1, 0, "Puffs")], 6, 24);
        let catalog = FieldCatalog::compile(&GENERIC);
        let mut claims = ClaimSet::new();
        let anchors = scan_anchors(&grid, &catalog, ScanOptions::from_catalog(&catalog), &mut claims);
        assert_eq!(anchors, vec![Anchor { row: 1, col: 0 }, Anchor { row: 3, col: 12 }]);
    }

    #[test]
    fn proximity_distance_is_strict() {
        // threshold 1 suppresses only the exact column; an adjacent match
        // is a new anchor. A threshold of 2 swallows the neighbor.
        let grid = grid_with(&[(0, 0, "Puffs"), (0, 1, "Puffs total")], 2, 4);
        let catalog = FieldCatalog::compile(&GENERIC);

        let mut claims = ClaimSet::new();
        let anchors = scan_anchors(&grid, &catalog, ScanOptions::from_catalog(&catalog), &mut claims);
        assert_eq!(anchors.len(), 2);

        let mut options = ScanOptions::from_catalog(&catalog);
        options.proximity = 2;
        let mut claims = ClaimSet::new();
        let anchors = scan_anchors(&grid, &catalog, options, &mut claims);
        assert_eq!(anchors, vec![Anchor { row: 0, col: 0 }]);
    }

    #[test]
    fn misaligned_anchor_rejected_when_alignment_required() {
        let grid = grid_with(&[(2, 5, "Puffs")], 4, 24);
        let catalog = FieldCatalog::compile(&OLD);
        let mut claims = ClaimSet::new();
        let anchors = scan_anchors(&grid, &catalog, ScanOptions::from_catalog(&catalog), &mut claims);
        assert!(anchors.is_empty());
    }

    #[test]
    fn misaligned_anchor_kept_when_alignment_relaxed() {
        let grid = grid_with(&[(2, 5, "Puffs")], 4, 24);
        let catalog = FieldCatalog::compile(&OLD);
        let mut options = ScanOptions::from_catalog(&catalog);
        options.require_alignment = false;
        let mut claims = ClaimSet::new();
        let anchors = scan_anchors(&grid, &catalog, options, &mut claims);
        assert_eq!(anchors, vec![Anchor { row: 2, col: 5 }]);
    }

    #[test]
    fn wide_proximity_suppresses_within_block() {
        // second "Puffs" 8 columns over is inside the 12-wide suppression
        // window, third one at the next block boundary is kept
        let grid = grid_with(&[(0, 0, "Puffs"), (0, 8, "Puffs"), (0, 12, "Puffs")], 2, 24);
        let catalog = FieldCatalog::compile(&OLD);
        let mut claims = ClaimSet::new();
        let anchors = scan_anchors(&grid, &catalog, ScanOptions::from_catalog(&catalog), &mut claims);
        assert_eq!(anchors, vec![Anchor { row: 0, col: 0 }, Anchor { row: 0, col: 12 }]);
    }

    #[test]
    fn same_column_different_rows_both_accepted() {
        let grid = grid_with(&[(0, 0, "Puffs"), (9, 0, "Puffs")], 12, 4);
        let catalog = FieldCatalog::compile(&GENERIC);
        let mut claims = ClaimSet::new();
        let anchors = scan_anchors(&grid, &catalog, ScanOptions::from_catalog(&catalog), &mut claims);
        assert_eq!(anchors.len(), 2);
    }
}
