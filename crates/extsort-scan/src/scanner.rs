//! Scanner that feeds walk events into an extension index.

use std::time::Instant;

use extsort_core::{ExtensionIndex, ScanConfig, ScanError};

use crate::progress::{ScanReport, ScanStats};
use crate::walker::{Walk, WalkEvent};

/// Builds an [`ExtensionIndex`] from a breadth-first walk of a directory tree.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Create a scanner for the given configuration.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// The configuration this scanner walks with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Start a lazy walk without indexing anything.
    pub fn walk(&self) -> Result<Walk<'_>, ScanError> {
        Walk::new(&self.config)
    }

    /// Scan into a fresh index sized by the configuration.
    pub fn build_index(&self) -> Result<(ExtensionIndex, ScanReport), ScanError> {
        let mut index = ExtensionIndex::with_slots(self.config.slot_count);
        let report = self.scan(&mut index)?;
        Ok((index, report))
    }

    /// Scan into an existing index.
    pub fn scan(&self, index: &mut ExtensionIndex) -> Result<ScanReport, ScanError> {
        self.scan_with(index, |_| {})
    }

    /// Scan into an existing index, showing every event to `observer` before
    /// it is applied.
    pub fn scan_with<F>(&self, index: &mut ExtensionIndex, mut observer: F) -> Result<ScanReport, ScanError>
    where
        F: FnMut(&WalkEvent),
    {
        let start = Instant::now();
        let mut stats = ScanStats::new();
        let mut warnings = Vec::new();

        tracing::debug!(root = %self.config.root.display(), "starting scan");

        for event in self.walk()? {
            observer(&event);
            stats.record(&event);

            match event {
                WalkEvent::DirectoryEntered(dir) => {
                    tracing::debug!(dir = %dir.display(), "entered directory");
                }
                WalkEvent::FileIndexed(record) => {
                    tracing::trace!(path = %record.source_path().display(), "indexed file");
                    index.insert_record(record);
                }
                WalkEvent::Warning(warning) => {
                    tracing::warn!(path = %warning.path.display(), "{}", warning.message);
                    warnings.push(warning);
                }
            }
        }

        let duration = start.elapsed();
        tracing::debug!(
            files = stats.files_indexed,
            dirs = stats.dirs_visited,
            ?duration,
            "scan finished"
        );

        Ok(ScanReport {
            root: self.config.root.clone(),
            stats,
            warnings,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.rs"), "test").unwrap();
        fs::write(root.join("dir2/file4"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let scanner = Scanner::new(ScanConfig::new(temp.path()));
        let (index, report) = scanner.build_index().unwrap();

        assert_eq!(report.stats.files_indexed, 4);
        assert_eq!(report.stats.dirs_visited, 4);
        assert_eq!(report.stats.bytes_indexed, 5 + 17 + 4 + 17);
        assert_eq!(index.file_count(), 4);
        assert_eq!(index.lookup("txt").unwrap().len(), 2);
        assert_eq!(index.lookup("rs").unwrap().len(), 1);
        assert_eq!(index.lookup("").unwrap().len(), 1);
    }

    #[test]
    fn test_observer_sees_every_event() {
        let temp = create_test_tree();
        let scanner = Scanner::new(ScanConfig::new(temp.path()));
        let mut index = ExtensionIndex::new();
        let mut dirs = 0;
        let mut files = 0;

        scanner
            .scan_with(&mut index, |event| match event {
                WalkEvent::DirectoryEntered(_) => dirs += 1,
                WalkEvent::FileIndexed(_) => files += 1,
                WalkEvent::Warning(_) => {}
            })
            .unwrap();

        assert_eq!(dirs, 4);
        assert_eq!(files, 4);
    }

    #[test]
    fn test_invalid_root() {
        let temp = TempDir::new().unwrap();
        let scanner = Scanner::new(ScanConfig::new(temp.path().join("missing")));
        assert!(matches!(scanner.build_index(), Err(ScanError::NotFound { .. })));
    }
}
