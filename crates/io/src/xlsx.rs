// Excel workbook import (xlsx, xls, xlsb, ods) and canonical export (xlsx)
//
// Import: evaluated cell values only — formula cells arrive as their cached
// results, which is what the legacy heuristics need to see.
// Export: exactly one sheet in the canonical layout. Not a round-trip format.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use rust_xlsxwriter::Workbook as XlsxWorkbook;

use pufflab_engine::cell::{Cell, CellGrid};
use pufflab_engine::error::ConvertError;

/// The template workbook sheet the canonical layout is projected onto.
pub const TEMPLATE_SHEET: &str = "Intense Test";

/// Load one worksheet into a cell grid.
///
/// With no explicit sheet name the first sheet is used. Positions are
/// absolute: a range that starts at C3 lands at (2, 2), because the legacy
/// formats are recognized by where cells sit, not by data extent.
pub fn load_grid(path: &Path, sheet: Option<&str>) -> Result<CellGrid, ConvertError> {
    let mut workbook = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(ConvertError::Read(format!(
            "workbook '{}' contains no sheets",
            path.display()
        )));
    }

    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(ConvertError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => sheet_names[0].clone(),
    };

    read_range(&mut workbook, &sheet_name)
}

/// Load the template workbook's canonical sheet.
pub fn load_template_grid(path: &Path) -> Result<CellGrid, ConvertError> {
    let mut workbook = open_workbook(path)?;
    if !workbook.sheet_names().iter().any(|s| s == TEMPLATE_SHEET) {
        return Err(ConvertError::TemplateMissing);
    }
    read_range(&mut workbook, TEMPLATE_SHEET)
}

fn open_workbook(path: &Path) -> Result<Sheets<std::io::BufReader<std::fs::File>>, ConvertError> {
    open_workbook_auto(path).map_err(|e| {
        ConvertError::Read(format!("failed to open '{}': {e}", path.display()))
    })
}

fn read_range(
    workbook: &mut Sheets<std::io::BufReader<std::fs::File>>,
    sheet_name: &str,
) -> Result<CellGrid, ConvertError> {
    let range: Range<Data> = workbook.worksheet_range(sheet_name).map_err(|e| {
        ConvertError::Read(format!("failed to read sheet '{sheet_name}': {e}"))
    })?;

    let (height, width) = range.get_size();
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut grid = CellGrid::new(start_row as usize + height, start_col as usize + width);

    for (row_idx, row) in range.rows().enumerate() {
        let target_row = start_row as usize + row_idx;
        for (col_idx, data) in row.iter().enumerate() {
            let target_col = start_col as usize + col_idx;
            let cell = match data {
                Data::Empty => continue,
                Data::String(s) => {
                    if s.is_empty() {
                        continue;
                    }
                    Cell::Text(s.clone())
                }
                Data::Float(n) => Cell::Number(*n),
                Data::Int(n) => Cell::Number(*n as f64),
                Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
                Data::Error(e) => Cell::Text(format!("#{e:?}")),
                Data::DateTime(dt) => match dt.as_datetime() {
                    Some(datetime) => Cell::Date(datetime),
                    // durations and out-of-range serials stay numeric
                    None => Cell::Number(dt.as_f64()),
                },
                Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            };
            grid.set(target_row, target_col, cell);
        }
    }

    Ok(grid)
}

/// Write the canonical sheet: the grid's first `width` columns, one sheet,
/// one save. Nothing touches disk until the workbook is complete.
pub fn write_sheet(
    grid: &CellGrid,
    width: usize,
    sheet_name: &str,
    path: &Path,
) -> Result<(), ConvertError> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| ConvertError::Write(format!("failed to create sheet '{sheet_name}': {e}")))?;

    let width = width.min(grid.ncols());
    for row in 0..grid.nrows() {
        for col in 0..width {
            match grid.cell(row, col) {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet
                        .write_string(row as u32, col as u16, s)
                        .map_err(|e| ConvertError::Write(e.to_string()))?;
                }
                Cell::Number(n) => {
                    worksheet
                        .write_number(row as u32, col as u16, *n)
                        .map_err(|e| ConvertError::Write(e.to_string()))?;
                }
                Cell::Date(_) => {
                    worksheet
                        .write_string(row as u32, col as u16, &grid.text(row, col))
                        .map_err(|e| ConvertError::Write(e.to_string()))?;
                }
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| ConvertError::Write(format!("failed to save '{}': {e}", path.display())))
}
