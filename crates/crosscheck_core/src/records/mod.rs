//! Review-record ingestion.
//!
//! Raw exports are parsed leniently into [`RawChangeRecord`]s, then
//! [`RecordExtractor`] groups them by project and derives the
//! `(a_hat, b_dir)` ratio pair for each one. Records that cannot be used are
//! reported alongside the results rather than aborting the run.

mod extractor;
mod ratios;
mod raw;

pub use extractor::*;
pub use ratios::{RatioFormula, has_defect_signal, is_defect_signal};
pub use raw::*;
