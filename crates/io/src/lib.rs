// File I/O operations

pub mod convert;
pub mod xlsx;

pub use convert::{convert, convert_with_options, Conversion, ConversionReport, ConvertOptions};
pub use pufflab_engine::error::ConvertError;
