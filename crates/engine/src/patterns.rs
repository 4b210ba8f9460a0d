//! Header recognizer tables.
//!
//! Every header the pipeline can recognize is declared here as data: a field
//! plus an ordered list of case-insensitive regexes, grouped into per-format
//! profiles. The scanner, associator, and extractor all consume the same
//! compiled catalog; none of them carry regex literals of their own.

use regex::Regex;

use crate::model::{DataField, MetaField};

/// A metadata field and the header spellings that identify it, in match
/// priority order.
pub struct FieldPattern {
    pub field: MetaField,
    pub patterns: &'static [&'static str],
}

/// Everything format-specific about block discovery and extraction.
pub struct FormatProfile {
    /// Recognizer for the block anchor (the "puffs" header).
    pub anchor: &'static str,
    /// Sample block width in columns.
    pub block_width: usize,
    /// Same-row suppression distance for anchor scanning.
    pub proximity: usize,
    /// Whether anchors must start at a block boundary (col % block_width == 0).
    pub require_alignment: bool,
    pub meta: &'static [FieldPattern],
    pub data: &'static [(DataField, &'static str)],
}

/// Profile for the new and unknown formats: headers may sit anywhere, so the
/// anchor match is loose and no alignment is required.
pub const GENERIC: FormatProfile = FormatProfile {
    anchor: r"puffs",
    block_width: 12,
    proximity: 1,
    require_alignment: false,
    meta: &[
        FieldPattern {
            field: MetaField::SampleName,
            patterns: &[
                r"cart(ridge)?\s*#|sample\s*(name|id)",
                r"puffing\s*data\s*for\s*:?\s*",
            ],
        },
        FieldPattern {
            field: MetaField::Resistance,
            patterns: &[
                r"\bri\s*\(?\s*ohms?\s*\)?\s*:?\s*",
                r"resistance\s*\(?ohms?\)?\s*:?\s*",
            ],
        },
        FieldPattern { field: MetaField::Voltage, patterns: &[r"voltage\s*:?\s*"] },
        FieldPattern { field: MetaField::Viscosity, patterns: &[r"viscosity\b\s*:?\s*"] },
        FieldPattern {
            field: MetaField::PuffingRegime,
            patterns: &[r"\b(puff(ing)?\s*regime|puff\s*settings?)\s*:?\s*"],
        },
        FieldPattern {
            field: MetaField::InitialOilMass,
            patterns: &[r"initial\s*oil\s*mass\b\s*:?\s*"],
        },
        FieldPattern { field: MetaField::Date, patterns: &[r"date\s*:?\s*"] },
        FieldPattern { field: MetaField::Media, patterns: &[r"media\s*:?\s*"] },
    ],
    data: &[
        (DataField::Puffs, r"puffs"),
        (DataField::Tpm, r"tpm\s*\(mg\s*/\s*puff\)"),
        (DataField::BeforeWeight, r"before\s*weight/g"),
        (DataField::AfterWeight, r"after\s*weight/g"),
        (DataField::DrawPressure, r"pv1|draw\s*pressure\s*\(kpa\)"),
        (DataField::Smell, r"smell"),
        (DataField::Notes, r"notes"),
    ],
};

/// Profile for the old format. Sheets of this generation repeat headers with
/// `.1`, `.2`, … suffixes, carry split Project/Sample name fields, and lay
/// samples out on strict 12-column boundaries, so the anchor match is exact
/// and alignment is enforced (subject to `ScanOptions`).
pub const OLD: FormatProfile = FormatProfile {
    anchor: r"^puffs?$",
    block_width: 12,
    proximity: 12,
    require_alignment: true,
    meta: &[
        FieldPattern {
            field: MetaField::Project,
            patterns: &[r"^project\s*:?\s*(?:\.\d+)?$"],
        },
        FieldPattern {
            field: MetaField::Sample,
            patterns: &[r"^sample\s*:?\s*(?:\.\d+)?$"],
        },
        FieldPattern {
            field: MetaField::Resistance,
            patterns: &[
                r"\bri\s*\(?\s*ohms?\s*\)?\s*:?\s*(?:\.\d+)?",
                r"resistance\s*\(?ohms?\)?\s*:?\s*(?:\.\d+)?",
            ],
        },
        FieldPattern { field: MetaField::Voltage, patterns: &[r"voltage\s*:?\s*(?:\.\d+)?"] },
        FieldPattern { field: MetaField::Viscosity, patterns: &[r"viscosity\b\s*:?\s*(?:\.\d+)?"] },
        FieldPattern {
            field: MetaField::PuffingRegime,
            patterns: &[r"\b(puff(ing)?\s*regime|puff\s*settings?)\s*:?\s*(?:\.\d+)?"],
        },
        FieldPattern {
            field: MetaField::InitialOilMass,
            patterns: &[r"initial\s*oil\s*mass\b\s*:?\s*(?:\.\d+)?"],
        },
        FieldPattern { field: MetaField::Date, patterns: &[r"date\s*:?\s*(?:\.\d+)?"] },
        FieldPattern { field: MetaField::Media, patterns: &[r"media\s*:?\s*(?:\.\d+)?"] },
    ],
    data: &[
        (DataField::Puffs, r"^puffs?$"),
        (DataField::Tpm, r"\btpm\b"),
        (DataField::BeforeWeight, r"before.{0,10}weight"),
        (DataField::AfterWeight, r"after.{0,10}weight"),
        (DataField::DrawPressure, r"draw.{0,10}pressure"),
        (DataField::Smell, r"\bsmell\b"),
        (DataField::Notes, r"\bnotes?\b"),
    ],
};

// ---------------------------------------------------------------------------
// Compiled catalog
// ---------------------------------------------------------------------------

/// A profile with its regexes compiled, built once per conversion.
pub struct FieldCatalog {
    pub anchor: Regex,
    pub meta: Vec<(MetaField, Vec<Regex>)>,
    pub data: Vec<(DataField, Regex)>,
    pub block_width: usize,
    pub proximity: usize,
    pub require_alignment: bool,
}

impl FieldCatalog {
    pub fn compile(profile: &FormatProfile) -> Self {
        let compile = |p: &str| Regex::new(&format!("(?i){p}")).unwrap();
        Self {
            anchor: compile(profile.anchor),
            meta: profile
                .meta
                .iter()
                .map(|fp| (fp.field, fp.patterns.iter().map(|p| compile(p)).collect()))
                .collect(),
            data: profile
                .data
                .iter()
                .map(|(field, p)| (*field, compile(p)))
                .collect(),
            block_width: profile.block_width,
            proximity: profile.proximity,
            require_alignment: profile.require_alignment,
        }
    }
}

/// Header test used everywhere: non-blank text matched against one
/// recognizer. The regexes carry `(?i)`, so no lowercasing happens here.
pub fn header_matches(text: &str, pattern: &Regex) -> bool {
    !text.is_empty() && pattern.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_anchor_is_substring_match() {
        let catalog = FieldCatalog::compile(&GENERIC);
        assert!(header_matches("Puffs", &catalog.anchor));
        assert!(header_matches("puffs", &catalog.anchor));
        // loose by design: part of a longer phrase still matches, the
        // scanner's proximity rule is what suppresses re-detection
        assert!(header_matches("Total Puffs", &catalog.anchor));
        assert!(!header_matches("", &catalog.anchor));
    }

    #[test]
    fn old_anchor_is_exact() {
        let catalog = FieldCatalog::compile(&OLD);
        assert!(header_matches("Puffs", &catalog.anchor));
        assert!(header_matches("puff", &catalog.anchor));
        assert!(!header_matches("Total Puffs", &catalog.anchor));
        assert!(!header_matches("puffing regime", &catalog.anchor));
    }

    #[test]
    fn old_meta_accepts_pandas_suffixes() {
        let catalog = FieldCatalog::compile(&OLD);
        let (_, project) = catalog
            .meta
            .iter()
            .find(|(f, _)| *f == MetaField::Project)
            .unwrap();
        assert!(header_matches("Project:", &project[0]));
        assert!(header_matches("Project:.2", &project[0]));
        assert!(!header_matches("Project Plan", &project[0]));
    }

    #[test]
    fn tpm_header_spellings() {
        let catalog = FieldCatalog::compile(&GENERIC);
        let (_, tpm) = catalog
            .data
            .iter()
            .find(|(f, _)| *f == DataField::Tpm)
            .unwrap();
        assert!(header_matches("TPM (mg/puff)", tpm));
        assert!(header_matches("tpm (mg / puff)", tpm));
        assert!(!header_matches("TPM", tpm));
    }
}
