//! Sample block extraction, one variant per legacy format generation.
//!
//! The old and new/unknown variants share the scan → associate → capture
//! pipeline and differ only in their pattern profile; the cart variant is a
//! fixed-layout format and reads its metadata from known cells.

use std::collections::HashMap;

use crate::cell::{Cell, CellGrid};
use crate::claim::ClaimSet;
use crate::format::LegacyFormat;
use crate::meta::{associate, resolve_sample_name};
use crate::model::{Anchor, DataField, MetaField, SampleRecord, Series};
use crate::patterns::{FieldCatalog, GENERIC, OLD};
use crate::scan::{scan_anchors, ScanOptions};
use crate::series::{capture_column, extract_series};

/// Rows searched from the top of a cart sheet for its single header row.
const CART_HEADER_SEARCH_ROWS: usize = 15;

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// When false, profiles that normally reject misaligned anchors accept
    /// them anyway. Off-boundary anchors in genuinely misaligned sheets are
    /// the one known casualty of strict alignment.
    pub strict_alignment: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { strict_alignment: true }
    }
}

/// Extract every accepted sample block from the grid.
///
/// A block is accepted only if both its puffs and tpm series were found;
/// anything else never becomes a record. Output order is block discovery
/// order.
pub fn extract_samples(
    grid: &CellGrid,
    format: LegacyFormat,
    options: &ExtractOptions,
) -> Vec<SampleRecord> {
    match format {
        LegacyFormat::Cart => extract_cart(grid),
        LegacyFormat::Old => extract_with_profile(grid, &FieldCatalog::compile(&OLD), format, options),
        LegacyFormat::New | LegacyFormat::Unknown => {
            extract_with_profile(grid, &FieldCatalog::compile(&GENERIC), format, options)
        }
    }
}

fn extract_with_profile(
    grid: &CellGrid,
    catalog: &FieldCatalog,
    format: LegacyFormat,
    options: &ExtractOptions,
) -> Vec<SampleRecord> {
    let mut claims = ClaimSet::new();
    let mut scan_options = ScanOptions::from_catalog(catalog);
    scan_options.require_alignment &= options.strict_alignment;

    let anchors = scan_anchors(grid, catalog, scan_options, &mut claims);
    let mut samples = Vec::new();

    for anchor in anchors {
        let series = extract_series(grid, &anchor, catalog);
        if !series.contains_key(&DataField::Puffs) || !series.contains_key(&DataField::Tpm) {
            continue;
        }
        let metadata = associate(grid, &anchor, catalog, &mut claims);
        let sample_name = resolve_sample_name(&metadata, format, samples.len());
        samples.push(SampleRecord {
            sample_name,
            metadata,
            series,
            anchor,
        });
    }

    samples
}

// ---------------------------------------------------------------------------
// Cart format
// ---------------------------------------------------------------------------

/// Cart sheets have one header row near the top, shared metadata at fixed
/// cells (Cart # in B2, Media in B3, Ri in D2, Viscosity in H2, Voltage in
/// H3), and PV1-PV5 columns instead of a draw pressure column.
fn extract_cart(grid: &CellGrid) -> Vec<SampleRecord> {
    let header_row = match (0..CART_HEADER_SEARCH_ROWS.min(grid.nrows()))
        .find(|&row| grid.text(row, 0).to_lowercase().contains("puff"))
    {
        Some(row) => row,
        None => return Vec::new(),
    };

    let tpm_cols: Vec<usize> = (0..grid.ncols())
        .filter(|&col| grid.text(header_row, col).to_lowercase().contains("tpm"))
        .collect();
    if tpm_cols.is_empty() {
        return Vec::new();
    }

    let mut puffs_cols: Vec<usize> = (0..grid.ncols())
        .filter(|&col| {
            let text = grid.text(header_row, col).to_lowercase();
            text == "puffs" || text == "puff"
        })
        .collect();
    if puffs_cols.is_empty() {
        // no explicit puffs header; cart sheets put puffs in column 0
        puffs_cols.push(0);
    }

    // Pair each puffs column with the nearest TPM column to its right.
    let mut blocks: Vec<(usize, usize)> = Vec::new();
    for &puffs_col in &puffs_cols {
        if let Some(&tpm_col) = tpm_cols.iter().filter(|&&c| c > puffs_col).min() {
            blocks.push((puffs_col, tpm_col));
        }
    }
    if blocks.is_empty() {
        blocks.push((0, tpm_cols[0]));
    }

    let shared = cart_metadata(grid);
    let base_name = shared
        .get(&MetaField::SampleName)
        .map(|c| c.display())
        .filter(|s| !s.is_empty());

    let data_start = header_row + 1;
    let mut samples = Vec::new();

    for (index, &(start_col, tpm_col)) in blocks.iter().enumerate() {
        let puffs = capture_column(grid, data_start, start_col, true);
        let tpm = capture_column(grid, data_start, tpm_col, true);
        if puffs.present() == 0 || tpm.present() == 0 {
            continue;
        }

        let mut series: HashMap<DataField, Series> = HashMap::new();
        series.insert(DataField::Puffs, puffs);
        series.insert(DataField::BeforeWeight, capture_column(grid, data_start, start_col + 1, true));
        series.insert(DataField::AfterWeight, capture_column(grid, data_start, start_col + 2, true));
        if let Some(col) = cart_pressure_col(grid, header_row, start_col, tpm_col) {
            series.insert(DataField::DrawPressure, capture_column(grid, data_start, col, true));
        }
        series.insert(DataField::Tpm, tpm);
        series.insert(DataField::Smell, Series::default());
        series.insert(DataField::Notes, Series::default());

        let sample_name = match (&base_name, index) {
            (Some(name), 0) => name.clone(),
            (Some(name), i) => format!("{name}_{}", i + 1),
            (None, i) => format!("Sample {}", i + 1),
        };

        samples.push(SampleRecord {
            sample_name,
            metadata: shared.clone(),
            series,
            anchor: Anchor { row: header_row, col: start_col },
        });
    }

    samples
}

fn cart_metadata(grid: &CellGrid) -> HashMap<MetaField, Cell> {
    let mut metadata = HashMap::new();
    for (field, row, col) in [
        (MetaField::SampleName, 1, 1),
        (MetaField::Media, 2, 1),
        (MetaField::Resistance, 1, 3),
        (MetaField::Viscosity, 1, 7),
        (MetaField::Voltage, 2, 7),
    ] {
        let cell = grid.cell(row, col);
        if !cell.is_blank() {
            metadata.insert(field, cell.clone());
        }
    }
    metadata
}

/// The pressure column is the first PV1/pressure header strictly between the
/// after-weight column and TPM, defaulting to the column right after
/// after-weight when none is labeled.
fn cart_pressure_col(
    grid: &CellGrid,
    header_row: usize,
    start_col: usize,
    tpm_col: usize,
) -> Option<usize> {
    for col in (start_col + 3)..tpm_col {
        let text = grid.text(header_row, col).to_lowercase();
        if text.contains("pv1") || text.contains("pressure") {
            return Some(col);
        }
    }
    if start_col + 3 < tpm_col {
        Some(start_col + 3)
    } else {
        None
    }
}
