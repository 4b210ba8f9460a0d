//! Data column capture for one sample block.

use std::collections::HashMap;

use crate::cell::{Cell, CellGrid};
use crate::model::{Anchor, DataField, Series, SeriesValue};
use crate::patterns::{header_matches, FieldCatalog};

/// Locate each data column's header in the anchor row, scanning rightward
/// within the block, and capture the cells below it as a series.
///
/// The first matching header wins per field. Fields whose header never
/// appears in the block are absent from the result.
pub fn extract_series(
    grid: &CellGrid,
    anchor: &Anchor,
    catalog: &FieldCatalog,
) -> HashMap<DataField, Series> {
    let mut series = HashMap::new();
    let col_end = (anchor.col + catalog.block_width).min(grid.ncols());

    for (field, pattern) in &catalog.data {
        for col in anchor.col..col_end {
            if header_matches(&grid.text(anchor.row, col), pattern) {
                series.insert(*field, capture_column(grid, anchor.row + 1, col, field.is_numeric()));
                break;
            }
        }
    }

    series
}

/// Capture one column from `start_row` to the bottom of the grid.
///
/// Numeric columns coerce per cell; anything unparsable is missing rather
/// than an error. Text columns are trimmed, with the literal "nan" (pandas
/// residue in re-saved sheets) normalized to empty. Trailing missing entries
/// are trimmed; interior gaps stay, the cutoff rule depends on them.
pub fn capture_column(grid: &CellGrid, start_row: usize, col: usize, numeric: bool) -> Series {
    let mut series = Series::default();
    for row in start_row..grid.nrows() {
        series.values.push(coerce(grid.cell(row, col), numeric));
    }
    series.trim_trailing_missing();
    series
}

fn coerce(cell: &Cell, numeric: bool) -> Option<SeriesValue> {
    if numeric {
        return cell.as_number().map(SeriesValue::Number);
    }
    let text = cell.display();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(SeriesValue::Text(text))
    }
}
