//! Breadth-first directory walker.

use std::collections::VecDeque;
use std::fs::{self, DirEntry, ReadDir};
use std::path::{Path, PathBuf};

use extsort_core::{FileRecord, ScanConfig, ScanError, ScanWarning, WarningKind};

/// Something the walker observed.
#[derive(Debug, Clone)]
pub enum WalkEvent {
    /// A directory was dequeued and is about to be enumerated.
    DirectoryEntered(PathBuf),
    /// A regular file was found.
    FileIndexed(FileRecord),
    /// An entry could not be read; the walk carries on without it.
    Warning(ScanWarning),
}

/// Lazy breadth-first traversal yielding [`WalkEvent`]s.
///
/// Directories are entered in FIFO order, so every directory at depth `n` is
/// entered before any directory at depth `n + 1`. Entries within one
/// directory come in whatever order the OS returns them.
#[derive(Debug)]
pub struct Walk<'a> {
    config: &'a ScanConfig,
    queue: VecDeque<PathBuf>,
    current: Option<(PathBuf, ReadDir)>,
    pending: Option<ScanWarning>,
}

impl<'a> Walk<'a> {
    /// Start a walk at `config.root`.
    ///
    /// Fails if the root does not exist or is not a directory.
    pub fn new(config: &'a ScanConfig) -> Result<Self, ScanError> {
        let metadata = fs::metadata(&config.root).map_err(|e| ScanError::io(&config.root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: config.root.clone(),
            });
        }

        Ok(Self {
            config,
            queue: VecDeque::from([config.root.clone()]),
            current: None,
            pending: None,
        })
    }

    /// Number of directories waiting to be entered.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    fn enter(&mut self, dir: PathBuf) -> WalkEvent {
        match fs::read_dir(&dir) {
            Ok(entries) => self.current = Some((dir.clone(), entries)),
            Err(err) => {
                self.pending = Some(ScanWarning::io(&dir, &err, WarningKind::ReadError));
            }
        }
        WalkEvent::DirectoryEntered(dir)
    }

    /// Classify one directory entry. Returns `None` for entries that produce
    /// no event (subdirectories, skipped names, special files).
    fn visit(&mut self, entry: DirEntry) -> Option<WalkEvent> {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if self.config.should_ignore(&name) || self.config.should_skip_hidden(&name) {
            return None;
        }

        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => return Some(warning(&path, &err, WarningKind::MetadataError)),
        };

        if file_type.is_dir() {
            self.queue.push_back(path);
            None
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(metadata) => self.record(&path, metadata.len()),
                Err(err) => Some(warning(&path, &err, WarningKind::MetadataError)),
            }
        } else if file_type.is_symlink() {
            self.visit_symlink(path)
        } else {
            None
        }
    }

    fn visit_symlink(&mut self, path: PathBuf) -> Option<WalkEvent> {
        match fs::metadata(&path) {
            Ok(target) if target.is_file() => self.record(&path, target.len()),
            Ok(target) if target.is_dir() && self.config.follow_symlinks => {
                self.queue.push_back(path);
                None
            }
            Ok(_) => None,
            Err(_) => {
                let target = fs::read_link(&path)
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default();
                Some(WalkEvent::Warning(ScanWarning::broken_symlink(&path, &target)))
            }
        }
    }

    fn record(&self, path: &Path, size: u64) -> Option<WalkEvent> {
        FileRecord::from_path(path, size, self.config.dotfile_policy).map(WalkEvent::FileIndexed)
    }
}

impl Iterator for Walk<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(warning) = self.pending.take() {
            return Some(WalkEvent::Warning(warning));
        }

        loop {
            let Some((dir, entries)) = self.current.as_mut() else {
                let dir = self.queue.pop_front()?;
                return Some(self.enter(dir));
            };

            match entries.next() {
                Some(Ok(entry)) => {
                    if let Some(event) = self.visit(entry) {
                        return Some(event);
                    }
                }
                Some(Err(err)) => {
                    return Some(warning(dir, &err, WarningKind::ReadError));
                }
                None => self.current = None,
            }
        }
    }
}

fn warning(path: &Path, err: &std::io::Error, kind: WarningKind) -> WalkEvent {
    WalkEvent::Warning(ScanWarning::io(path, err, kind))
}
