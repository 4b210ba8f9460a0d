//! Emptiness filtering: dropping blocks that carry no meaningful
//! measurement before they reach the template.

use crate::model::{DataField, SampleRecord};

/// A puffs series must exceed this many present entries to count as a valid
/// in-progress run on its own. Inherited threshold; do not re-derive.
pub const MEANINGFUL_PUFF_COUNT: usize = 2;

/// Decide whether a sample carries meaningful data.
///
/// Any finite non-zero TPM value qualifies; failing that, a puffs series
/// with more than [`MEANINGFUL_PUFF_COUNT`] present entries is treated as a
/// valid in-progress measurement. Everything else — including blocks that
/// are pure metadata stubs with no data series — is dropped.
pub fn is_meaningful(record: &SampleRecord) -> bool {
    if let Some(tpm) = record.series_for(DataField::Tpm) {
        if tpm.numbers().any(|n| n.is_finite() && n != 0.0) {
            return true;
        }
    }

    if let Some(puffs) = record.series_for(DataField::Puffs) {
        if puffs.present() > MEANINGFUL_PUFF_COUNT {
            return true;
        }
    }

    false
}

/// Drop non-meaningful records, keeping the survivors contiguous in their
/// original order (the projector assigns output slots by position).
pub fn filter_samples(samples: Vec<SampleRecord>) -> Vec<SampleRecord> {
    samples.into_iter().filter(is_meaningful).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::cell::Cell;
    use crate::model::{Anchor, MetaField, Series, SeriesValue};

    fn record(tpm: &[Option<f64>], puffs: &[Option<f64>]) -> SampleRecord {
        let series_of = |values: &[Option<f64>]| Series {
            values: values.iter().map(|v| v.map(SeriesValue::Number)).collect(),
        };
        let mut series = HashMap::new();
        series.insert(DataField::Tpm, series_of(tpm));
        series.insert(DataField::Puffs, series_of(puffs));
        SampleRecord {
            sample_name: "s".into(),
            metadata: HashMap::new(),
            series,
            anchor: Anchor { row: 0, col: 0 },
        }
    }

    #[test]
    fn nonzero_tpm_is_meaningful() {
        let r = record(&[Some(0.0), Some(0.4)], &[Some(1.0)]);
        assert!(is_meaningful(&r));
    }

    #[test]
    fn all_zero_tpm_with_short_puffs_is_not() {
        let r = record(&[Some(0.0), Some(0.0), Some(0.0)], &[Some(1.0), Some(2.0)]);
        assert!(!is_meaningful(&r));
    }

    #[test]
    fn long_puffs_series_rescues_missing_tpm() {
        let r = record(&[None, None], &[Some(1.0), Some(2.0), Some(3.0)]);
        assert!(is_meaningful(&r));
    }

    #[test]
    fn puff_threshold_is_exclusive() {
        // exactly MEANINGFUL_PUFF_COUNT present entries is not enough
        let r = record(&[Some(0.0)], &[Some(1.0), Some(2.0)]);
        assert!(!is_meaningful(&r));
        let r = record(&[Some(0.0)], &[Some(1.0), Some(2.0), Some(3.0)]);
        assert!(is_meaningful(&r));
    }

    #[test]
    fn metadata_stub_is_dropped() {
        let mut r = record(&[], &[]);
        r.metadata.insert(MetaField::Voltage, Cell::Text("3.7".into()));
        assert!(!is_meaningful(&r));
    }

    #[test]
    fn filter_keeps_order_and_drops_empties() {
        let keep_a = record(&[Some(0.5)], &[Some(1.0)]);
        let drop_b = record(&[Some(0.0)], &[Some(1.0)]);
        let keep_c = record(&[], &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let kept = filter_samples(vec![keep_a, drop_b, keep_c]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].series[&DataField::Tpm].present(), 1);
        assert_eq!(kept[1].series[&DataField::Puffs].present(), 4);
    }
}
