//! Metadata association: binding header/value pairs near an anchor to the
//! sample that starts there.

use std::collections::{HashMap, HashSet};

use crate::cell::{Cell, CellGrid};
use crate::claim::ClaimSet;
use crate::format::LegacyFormat;
use crate::model::{Anchor, MetaField};
use crate::patterns::{header_matches, FieldCatalog};

/// How many rows above the anchor are searched for metadata headers.
const META_SEARCH_ROWS: usize = 3;

/// Search the rows above `anchor` for metadata headers and bind each match's
/// adjacent value (one column to the right).
///
/// Rows are scanned from the one immediately above the anchor upward, so the
/// closest occurrence of a field wins; a field once resolved is never
/// re-matched. Matched header cells are claimed — a header bound to this
/// sample can never be bound to another. A field that cannot be located is
/// simply absent from the result; that is the expected common case, not an
/// error.
pub fn associate(
    grid: &CellGrid,
    anchor: &Anchor,
    catalog: &FieldCatalog,
    claims: &mut ClaimSet,
) -> HashMap<MetaField, Cell> {
    let mut found: HashMap<MetaField, Cell> = HashMap::new();
    let mut resolved: HashSet<MetaField> = HashSet::new();

    if anchor.row == 0 {
        return found;
    }

    let first_row = anchor.row.saturating_sub(META_SEARCH_ROWS);
    let col_end = (anchor.col + catalog.block_width).min(grid.ncols());

    for row in (first_row..anchor.row).rev() {
        for col in anchor.col..col_end {
            if claims.is_claimed(row, col) {
                continue;
            }
            let text = grid.text(row, col);
            if text.is_empty() {
                continue;
            }

            'fields: for (field, patterns) in &catalog.meta {
                if resolved.contains(field) {
                    continue;
                }
                for pattern in patterns {
                    if header_matches(&text, pattern) {
                        claims.claim(row, col);
                        resolved.insert(*field);
                        let value = grid.cell(row, col + 1);
                        if !value.is_blank() {
                            found.insert(*field, value.clone());
                        }
                        break 'fields;
                    }
                }
            }
        }
    }

    found
}

/// Resolve the sample's display name from its metadata.
///
/// Old format splits the name across Project/Sample fields; both present
/// combine as `"{project} {sample}"`, one alone is used as-is. Every format
/// falls back to the positional `"Sample {n}"` default.
pub fn resolve_sample_name(
    metadata: &HashMap<MetaField, Cell>,
    format: LegacyFormat,
    index: usize,
) -> String {
    if format == LegacyFormat::Old {
        let project = metadata.get(&MetaField::Project).map(|c| c.display());
        let sample = metadata.get(&MetaField::Sample).map(|c| c.display());
        return match (project, sample) {
            (Some(p), Some(s)) => format!("{p} {s}"),
            (Some(p), None) => p,
            (None, Some(s)) => s,
            (None, None) => format!("Sample {}", index + 1),
        };
    }

    metadata
        .get(&MetaField::SampleName)
        .map(|c| c.display())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("Sample {}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{FieldCatalog, GENERIC, OLD};

    fn grid_with(cells: &[(usize, usize, &str)], nrows: usize, ncols: usize) -> CellGrid {
        let mut grid = CellGrid::new(nrows, ncols);
        for (row, col, text) in cells {
            grid.set(*row, *col, Cell::Text((*text).to_string()));
        }
        grid
    }

    #[test]
    fn binds_adjacent_value() {
        let grid = grid_with(
            &[(1, 0, "Voltage:"), (1, 1, "3.7"), (3, 0, "Puffs")],
            6,
            12,
        );
        let catalog = FieldCatalog::compile(&GENERIC);
        let mut claims = ClaimSet::new();
        let meta = associate(&grid, &Anchor { row: 3, col: 0 }, &catalog, &mut claims);
        assert_eq!(meta.get(&MetaField::Voltage), Some(&Cell::Text("3.7".into())));
        assert!(claims.is_claimed(1, 0));
    }

    #[test]
    fn project_and_sample_combine_for_old_format() {
        let grid = grid_with(
            &[
                (1, 0, "Project:"),
                (1, 1, "Acme"),
                (1, 2, "Sample:"),
                (1, 3, "X1"),
                (3, 0, "Puffs"),
            ],
            6,
            12,
        );
        let catalog = FieldCatalog::compile(&OLD);
        let mut claims = ClaimSet::new();
        let meta = associate(&grid, &Anchor { row: 3, col: 0 }, &catalog, &mut claims);
        assert_eq!(
            resolve_sample_name(&meta, LegacyFormat::Old, 0),
            "Acme X1"
        );
    }

    #[test]
    fn single_old_name_field_used_alone() {
        let mut meta = HashMap::new();
        meta.insert(MetaField::Project, Cell::Text("Acme".into()));
        assert_eq!(resolve_sample_name(&meta, LegacyFormat::Old, 4), "Acme");

        let mut meta = HashMap::new();
        meta.insert(MetaField::Sample, Cell::Text("X1".into()));
        assert_eq!(resolve_sample_name(&meta, LegacyFormat::Old, 4), "X1");

        let meta = HashMap::new();
        assert_eq!(resolve_sample_name(&meta, LegacyFormat::Old, 4), "Sample 5");
        assert_eq!(resolve_sample_name(&meta, LegacyFormat::New, 0), "Sample 1");
    }

    #[test]
    fn closest_row_wins() {
        let grid = grid_with(
            &[
                (0, 0, "Voltage:"),
                (0, 1, "far"),
                (2, 0, "Voltage:"),
                (2, 1, "near"),
                (3, 0, "Puffs"),
            ],
            6,
            12,
        );
        let catalog = FieldCatalog::compile(&GENERIC);
        let mut claims = ClaimSet::new();
        let meta = associate(&grid, &Anchor { row: 3, col: 0 }, &catalog, &mut claims);
        assert_eq!(meta.get(&MetaField::Voltage), Some(&Cell::Text("near".into())));
    }

    #[test]
    fn claimed_header_is_not_rebound() {
        // the header sits where both anchors' search windows overlap;
        // whoever claims it first keeps it
        let grid = grid_with(
            &[(1, 4, "Voltage:"), (1, 5, "3.7"), (3, 0, "Puffs"), (3, 4, "Puffs")],
            6,
            24,
        );
        let catalog = FieldCatalog::compile(&GENERIC);
        let mut claims = ClaimSet::new();
        let first = associate(&grid, &Anchor { row: 3, col: 0 }, &catalog, &mut claims);
        let second = associate(&grid, &Anchor { row: 3, col: 4 }, &catalog, &mut claims);
        assert!(first.contains_key(&MetaField::Voltage));
        assert!(!second.contains_key(&MetaField::Voltage));
    }

    #[test]
    fn search_restricted_to_block_columns() {
        // header sits left of the anchor column; the window never looks there
        let grid = grid_with(
            &[(1, 2, "Voltage:"), (1, 3, "3.7"), (3, 4, "Puffs")],
            6,
            24,
        );
        let catalog = FieldCatalog::compile(&GENERIC);
        let mut claims = ClaimSet::new();
        let meta = associate(&grid, &Anchor { row: 3, col: 4 }, &catalog, &mut claims);
        assert!(meta.is_empty());
    }

    #[test]
    fn blank_adjacent_value_resolves_field_without_binding() {
        let grid = grid_with(
            &[(1, 0, "Voltage:"), (2, 0, "Voltage:"), (2, 1, ""), (3, 0, "Puffs")],
            6,
            12,
        );
        let catalog = FieldCatalog::compile(&GENERIC);
        let mut claims = ClaimSet::new();
        let meta = associate(&grid, &Anchor { row: 3, col: 0 }, &catalog, &mut claims);
        // row 2 header claimed first (closest), resolves the field with no
        // value; the row-1 header is never consulted for it
        assert!(meta.get(&MetaField::Voltage).is_none());
        assert!(claims.is_claimed(2, 0));
        assert!(!claims.is_claimed(1, 0));
    }

    #[test]
    fn anchor_in_top_row_has_no_metadata() {
        let grid = grid_with(&[(0, 0, "Puffs")], 4, 12);
        let catalog = FieldCatalog::compile(&GENERIC);
        let mut claims = ClaimSet::new();
        let meta = associate(&grid, &Anchor { row: 0, col: 0 }, &catalog, &mut claims);
        assert!(meta.is_empty());
    }
}
