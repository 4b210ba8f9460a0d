use std::fmt;

#[derive(Debug)]
pub enum ConvertError {
    /// The template workbook has no "Intense Test" sheet.
    TemplateMissing,
    /// An explicitly requested source sheet does not exist.
    SheetNotFound(String),
    /// The scanner/extractor pipeline accepted zero blocks.
    NoSampleData,
    /// Every accepted block failed the emptiness filter.
    AllSamplesEmpty,
    /// Workbook open/parse failure.
    Read(String),
    /// Workbook save or filesystem failure.
    Write(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateMissing => {
                write!(f, "template workbook has no 'Intense Test' sheet")
            }
            Self::SheetNotFound(name) => write!(f, "sheet '{name}' not found in workbook"),
            Self::NoSampleData => write!(f, "no valid sample data found"),
            Self::AllSamplesEmpty => {
                write!(f, "no samples with meaningful data found after filtering")
            }
            Self::Read(msg) => write!(f, "read error: {msg}"),
            Self::Write(msg) => write!(f, "write error: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}
