//! Outcome of a reorganize pass.

use crate::error::OperationError;
use crate::reorganize::ReorganizeEvent;

/// Counters and errors collected from a reorganize pass.
#[derive(Debug, Clone, Default)]
pub struct ReorganizeSummary {
    /// Whether the pass was a dry run.
    pub dry_run: bool,
    /// Destination folders that had to be created.
    pub folders_created: usize,
    /// Destination folders that could not be created.
    pub folders_failed: usize,
    /// Files copied.
    pub copied: usize,
    /// Files skipped because of a conflict.
    pub skipped: usize,
    /// Files whose source vanished after indexing.
    pub missing: usize,
    /// Files that failed to copy.
    pub failed: usize,
    /// Total bytes copied.
    pub bytes_copied: u64,
    /// Folder and copy errors, in the order they occurred.
    pub errors: Vec<OperationError>,
}

impl ReorganizeSummary {
    /// Create an empty summary.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Fold one event into the summary.
    pub fn record(&mut self, event: ReorganizeEvent) {
        match event {
            ReorganizeEvent::FolderReady { created, .. } => {
                if created {
                    self.folders_created += 1;
                }
            }
            ReorganizeEvent::FolderFailed { error, .. } => {
                self.folders_failed += 1;
                self.errors.push(error);
            }
            ReorganizeEvent::Copied { bytes, .. } => {
                self.copied += 1;
                self.bytes_copied += bytes;
            }
            ReorganizeEvent::Skipped { .. } => self.skipped += 1,
            ReorganizeEvent::SourceMissing { .. } => self.missing += 1,
            ReorganizeEvent::CopyFailed { error } => {
                self.failed += 1;
                self.errors.push(error);
            }
        }
    }

    /// Check if every folder was created and every existing source copied.
    pub fn is_success(&self) -> bool {
        self.folders_failed == 0 && self.failed == 0
    }

    /// Get a human-readable summary of the pass.
    pub fn summary(&self) -> String {
        let action = if self.dry_run { "Would copy" } else { "Copied" };
        let mut text = format!("{} {} files", action, self.copied);

        for (count, label) in [
            (self.skipped, "skipped"),
            (self.missing, "missing"),
            (self.failed, "failed"),
            (self.folders_failed, "folders failed"),
        ] {
            if count > 0 {
                text.push_str(&format!(", {count} {label}"));
            }
        }
        text
    }
}
