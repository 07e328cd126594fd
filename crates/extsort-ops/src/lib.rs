//! Reorganize engine for extsort.
//!
//! Consumes an [`ExtensionIndex`](extsort_core::ExtensionIndex) and copies
//! every indexed file into `<destination>/<extension>_files/`, bucket by
//! bucket, in filename order. Failures are reported per folder or per file
//! and never abort the pass.

mod conflict;
mod error;
mod reorganize;
mod summary;

pub use conflict::{ConflictKind, ConflictResolution, auto_rename_path};
pub use error::OperationError;
pub use reorganize::{
    Reorganize, ReorganizeEvent, ReorganizeOptions, ReorganizeOptionsBuilder,
    ReorganizeOptionsBuilderError, reorganize, reorganize_with,
};
pub use summary::ReorganizeSummary;
