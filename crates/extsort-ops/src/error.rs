//! Per-entry errors for reorganize passes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error that affected one folder or file; the pass continues past it.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{}: {}", .path.display(), .message)]
pub struct OperationError {
    /// The path that caused the error.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    /// Create a new operation error.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
