//! `pufflab-engine` — legacy puff-test spreadsheet normalization engine.
//!
//! Pure engine crate: receives a loaded cell grid, recovers per-sample
//! records from it, and projects them onto the canonical template grid.
//! No CLI or IO dependencies.

pub mod cell;
pub mod claim;
pub mod error;
pub mod extract;
pub mod filter;
pub mod format;
pub mod meta;
pub mod model;
pub mod normalize;
pub mod patterns;
pub mod scan;
pub mod series;
pub mod template;

pub use cell::{Cell, CellGrid};
pub use error::ConvertError;
pub use extract::ExtractOptions;
pub use format::{detect_format, LegacyFormat};
pub use model::{Anchor, SampleRecord};
pub use normalize::{normalize, NormalizeOutcome};
