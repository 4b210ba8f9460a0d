//! Projection into the canonical template layout.
//!
//! Every retained sample is assigned a contiguous 12-column block; metadata
//! lands at fixed offsets within the block's top rows and data series start
//! at a fixed row, truncated at the first gap in the after-weight column.

use crate::cell::{Cell, CellGrid};
use crate::model::{DataField, MetaField, SampleRecord, SeriesValue};

/// Columns per sample block in the canonical layout.
pub const BLOCK_WIDTH: usize = 12;

/// First data row of each block (rows above it hold metadata).
pub const DATA_START_ROW: usize = 4;

/// Metadata slots: field → (row, column offset) within the block.
pub const META_SLOTS: &[(MetaField, usize, usize)] = &[
    (MetaField::SampleName, 0, 5),
    (MetaField::Date, 0, 3),
    (MetaField::Media, 1, 1),
    (MetaField::Resistance, 1, 3),
    (MetaField::PuffingRegime, 1, 7),
    (MetaField::Viscosity, 2, 1),
    (MetaField::Voltage, 2, 5),
    (MetaField::InitialOilMass, 2, 7),
];

/// Data column slots: field → column offset within the block.
pub const DATA_SLOTS: &[(DataField, usize)] = &[
    (DataField::Puffs, 0),
    (DataField::BeforeWeight, 1),
    (DataField::AfterWeight, 2),
    (DataField::DrawPressure, 3),
    (DataField::Smell, 5),
    (DataField::Notes, 7),
    (DataField::Tpm, 8),
];

/// Row count written for a sample: the index of the first missing entry in
/// its after-weight series, or the whole series when it has no gap. A block
/// without an after-weight column writes no data rows at all.
pub fn after_weight_cutoff(record: &SampleRecord) -> usize {
    let series = match record.series_for(DataField::AfterWeight) {
        Some(s) => s,
        None => return 0,
    };
    series
        .values
        .iter()
        .position(|v| v.is_none())
        .unwrap_or(series.len())
}

/// Project retained samples onto the template grid, in order, one 12-column
/// block each. Returns the total column count the canonical sheet keeps
/// (blocks × width); the writer discards everything beyond it.
///
/// The template grid arrives pre-populated with the canonical sheet's cell
/// values; projection overwrites each block's slots and clears the rows
/// below the cutoff so residue from a larger block previously written at
/// this position cannot survive.
pub fn project(template: &mut CellGrid, samples: &[SampleRecord], source_stem: &str) -> usize {
    for (index, record) in samples.iter().enumerate() {
        let block = index * BLOCK_WIDTH;

        // Block header: source workbook name, then the fixed metadata slots.
        template.set(0, block, Cell::Text(source_stem.to_string()));
        for &(field, row, offset) in META_SLOTS {
            if field == MetaField::SampleName {
                template.set(row, block + offset, Cell::Text(record.sample_name.clone()));
            } else if let Some(value) = record.metadata_for(field) {
                template.set(row, block + offset, value.clone());
            }
        }

        let cutoff = after_weight_cutoff(record);

        for &(field, offset) in DATA_SLOTS {
            let series = match record.series_for(field) {
                Some(s) => s,
                None => continue,
            };
            for (row, value) in series.values.iter().take(cutoff).enumerate() {
                let cell = match value {
                    Some(SeriesValue::Number(n)) => Cell::Number(*n),
                    Some(SeriesValue::Text(s)) => Cell::Text(s.clone()),
                    None => Cell::Empty,
                };
                template.set(DATA_START_ROW + row, block + offset, cell);
            }
        }

        // Clear everything below this block's data.
        for row in (DATA_START_ROW + cutoff)..template.nrows() {
            for col in block..block + BLOCK_WIDTH {
                template.clear(row, col);
            }
        }
    }

    samples.len() * BLOCK_WIDTH
}
