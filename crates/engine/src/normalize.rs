//! Top-level pure pipeline: classify → extract → filter.

use crate::cell::CellGrid;
use crate::error::ConvertError;
use crate::extract::{extract_samples, ExtractOptions};
use crate::filter::filter_samples;
use crate::format::{detect_format, LegacyFormat};
use crate::model::SampleRecord;

/// Result of normalizing one worksheet grid.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub format: LegacyFormat,
    /// Blocks accepted by the extractor, before emptiness filtering.
    pub extracted: usize,
    /// Retained samples, contiguous in output order.
    pub samples: Vec<SampleRecord>,
}

/// Run the full extraction pipeline over a loaded grid.
///
/// Fails only on the two block-level conditions: no accepted block at all,
/// or every accepted block filtered out as empty. Per-field problems never
/// surface here; they are recorded as missing values during extraction.
pub fn normalize(grid: &CellGrid, options: &ExtractOptions) -> Result<NormalizeOutcome, ConvertError> {
    let format = detect_format(grid);
    let extracted = extract_samples(grid, format, options);
    if extracted.is_empty() {
        return Err(ConvertError::NoSampleData);
    }

    let count = extracted.len();
    let samples = filter_samples(extracted);
    if samples.is_empty() {
        return Err(ConvertError::AllSamplesEmpty);
    }

    Ok(NormalizeOutcome {
        format,
        extracted: count,
        samples,
    })
}
