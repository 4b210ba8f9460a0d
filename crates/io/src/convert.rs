//! Conversion orchestration: one legacy workbook in, one canonical workbook
//! out, plus a report of what happened on the way.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use pufflab_engine::error::ConvertError;
use pufflab_engine::extract::ExtractOptions;
use pufflab_engine::format::LegacyFormat;
use pufflab_engine::normalize::normalize;
use pufflab_engine::template::project;

use crate::xlsx;

/// Excel's sheet name length limit.
const SHEET_NAME_LIMIT: usize = 31;

/// Template workbooks tried, in order, when none is given explicitly.
const DEFAULT_TEMPLATES: &[&str] = &[
    "resources/Standardized Test Template - December 2025.xlsx",
    "resources/Standardized Test Template - LATEST VERSION - 2025 Jan.xlsx",
];

/// Subdirectory (beside the source file) that converted workbooks land in
/// unless an output directory is given.
const DEFAULT_OUT_DIR: &str = "legacy data";

/// Conversion knobs. The defaults match the batch pipeline: template and
/// output locations derived, first sheet, strict anchor alignment.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Template workbook path; the bundled candidates are tried when unset.
    pub template: Option<PathBuf>,
    /// Destination directory; `<source dir>/legacy data` when unset.
    pub out_dir: Option<PathBuf>,
    /// Source sheet to read; first sheet when unset.
    pub sheet: Option<String>,
    /// Enforce block-boundary alignment where the format profile asks for it.
    pub strict_alignment: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            template: None,
            out_dir: None,
            sheet: None,
            strict_alignment: true,
        }
    }
}

/// What one conversion did.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub source: String,
    pub format: LegacyFormat,
    /// Blocks accepted by the extractor.
    pub samples_extracted: usize,
    /// Samples that survived the emptiness filter and were written.
    pub samples_kept: usize,
    pub sheet_name: String,
    pub warnings: Vec<String>,
    pub duration_ms: u128,
}

impl ConversionReport {
    /// One-line summary suitable for display.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} format", self.format),
            format!(
                "{} sample{}",
                self.samples_kept,
                if self.samples_kept == 1 { "" } else { "s" }
            ),
        ];
        if self.samples_extracted > self.samples_kept {
            parts.push(format!(
                "{} filtered out",
                self.samples_extracted - self.samples_kept
            ));
        }
        parts.join(" · ")
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A finished conversion: where the canonical workbook went and the report.
#[derive(Debug)]
pub struct Conversion {
    pub output_path: PathBuf,
    pub report: ConversionReport,
}

/// Convert a legacy workbook with default options.
pub fn convert(source: &Path) -> Result<Conversion, ConvertError> {
    convert_with_options(source, &ConvertOptions::default())
}

/// Convert a legacy workbook into the canonical template layout.
///
/// The whole pipeline runs in memory and the output workbook is saved once
/// at the end; a conversion that fails leaves no partial file behind.
pub fn convert_with_options(
    source: &Path,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let start = Instant::now();

    let template_path = resolve_template(options)?;
    let mut template = xlsx::load_template_grid(&template_path)?;

    let grid = xlsx::load_grid(source, options.sheet.as_deref())?;
    let outcome = normalize(
        &grid,
        &ExtractOptions {
            strict_alignment: options.strict_alignment,
        },
    )?;

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("legacy");

    let width = project(&mut template, &outcome.samples, stem);

    let mut warnings = Vec::new();
    if outcome.extracted > outcome.samples.len() {
        warnings.push(format!(
            "{} empty sample block(s) filtered out",
            outcome.extracted - outcome.samples.len()
        ));
    }

    let full_sheet_name = format!("{stem} Data");
    let sheet_name: String = full_sheet_name.chars().take(SHEET_NAME_LIMIT).collect();
    if sheet_name != full_sheet_name {
        warnings.push(format!("sheet name truncated to '{sheet_name}'"));
    }

    let out_dir = match &options.out_dir {
        Some(dir) => dir.clone(),
        None => source
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_OUT_DIR),
    };
    std::fs::create_dir_all(&out_dir).map_err(|e| {
        ConvertError::Write(format!("failed to create '{}': {e}", out_dir.display()))
    })?;

    let file_name = match outcome.format {
        LegacyFormat::Cart => format!("{stem} Legacy Cart.xlsx"),
        _ => format!("{stem} Legacy.xlsx"),
    };
    let output_path = out_dir.join(file_name);

    xlsx::write_sheet(&template, width, &sheet_name, &output_path)?;

    Ok(Conversion {
        output_path,
        report: ConversionReport {
            source: source.display().to_string(),
            format: outcome.format,
            samples_extracted: outcome.extracted,
            samples_kept: outcome.samples.len(),
            sheet_name,
            warnings,
            duration_ms: start.elapsed().as_millis(),
        },
    })
}

fn resolve_template(options: &ConvertOptions) -> Result<PathBuf, ConvertError> {
    if let Some(path) = &options.template {
        if !path.exists() {
            return Err(ConvertError::Read(format!(
                "template file '{}' not found",
                path.display()
            )));
        }
        return Ok(path.clone());
    }

    DEFAULT_TEMPLATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| ConvertError::Read("no template file found".to_string()))
}
