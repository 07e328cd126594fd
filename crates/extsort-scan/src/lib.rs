//! Directory scanning for extsort.
//!
//! This crate walks a directory tree breadth-first with an explicit FIFO
//! queue and feeds every regular file it finds into an
//! [`ExtensionIndex`](extsort_core::ExtensionIndex).
//!
//! # Overview
//!
//! - [`Walk`] is a lazy iterator of [`WalkEvent`]s: directories entered,
//!   files found, and per-entry warnings. It does no I/O beyond reading
//!   directories and metadata, and prints nothing.
//! - [`Scanner`] drains a walk into an index and returns a [`ScanReport`].
//!
//! # Example
//!
//! ```rust,no_run
//! use extsort_scan::{ScanConfig, Scanner, WalkEvent};
//!
//! let scanner = Scanner::new(ScanConfig::new("/path/to/scan"));
//! let mut index = extsort_core::ExtensionIndex::new();
//!
//! let report = scanner
//!     .scan_with(&mut index, |event| {
//!         if let WalkEvent::DirectoryEntered(dir) = event {
//!             println!("Directory: {}", dir.display());
//!         }
//!     })
//!     .unwrap();
//!
//! println!("Indexed {} files", report.stats.files_indexed);
//! ```

mod progress;
mod scanner;
mod walker;

pub use progress::{ScanReport, ScanStats};
pub use scanner::Scanner;
pub use walker::{Walk, WalkEvent};

// Re-export core types for convenience
pub use extsort_core::{
    DotfilePolicy, ExtensionIndex, FileRecord, ScanConfig, ScanError, ScanWarning, WarningKind,
};
