//! Scan statistics and reports.

use std::path::PathBuf;
use std::time::Duration;

use extsort_core::ScanWarning;

use crate::walker::WalkEvent;

/// Running counters for a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Directories entered, including the root.
    pub dirs_visited: u64,
    /// Regular files indexed.
    pub files_indexed: u64,
    /// Total size of indexed files.
    pub bytes_indexed: u64,
    /// Non-fatal warnings.
    pub warnings: u64,
}

impl ScanStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one walk event.
    pub fn record(&mut self, event: &WalkEvent) {
        match event {
            WalkEvent::DirectoryEntered(_) => self.dirs_visited += 1,
            WalkEvent::FileIndexed(record) => {
                self.files_indexed += 1;
                self.bytes_indexed += record.size();
            }
            WalkEvent::Warning(_) => self.warnings += 1,
        }
    }
}

/// Summary of a finished scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Root path that was scanned.
    pub root: PathBuf,
    /// Final counters.
    pub stats: ScanStats,
    /// Warnings encountered, in the order they occurred.
    pub warnings: Vec<ScanWarning>,
    /// Wall-clock duration of the scan.
    pub duration: Duration,
}

impl ScanReport {
    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.stats.files_indexed as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}
