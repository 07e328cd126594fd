//! Core types for extsort.
//!
//! This crate provides the in-memory index at the heart of extsort: file
//! records, the name-ordered bucket tree, and the fixed-slot extension index
//! that chains buckets on hash collisions.

mod config;
mod error;
mod index;
mod record;
mod tree;

pub use config::{ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use index::{Bucket, Buckets, DEFAULT_SLOT_COUNT, ExtensionIndex, hash_extension};
pub use record::{DotfilePolicy, FileRecord, extension_of};
pub use tree::{BucketTree, Iter as RecordIter};
