//! Copy indexed files into per-extension folders.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use extsort_core::{Buckets, ExtensionIndex, FileRecord, RecordIter};

use crate::conflict::{ConflictKind, ConflictResolution, auto_rename_path_with, is_same_file};
use crate::error::OperationError;
use crate::summary::ReorganizeSummary;

/// Options for a reorganize pass.
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
pub struct ReorganizeOptions {
    /// What to do when the destination file already exists.
    #[serde(default)]
    pub conflict: ConflictResolution,

    /// Report what would happen without touching the filesystem.
    ///
    /// Destinations planned earlier in the pass count as occupied, so
    /// conflicts between indexed files resolve as they would in a real run.
    #[serde(default)]
    pub dry_run: bool,
}

impl ReorganizeOptions {
    /// Create a new options builder.
    pub fn builder() -> ReorganizeOptionsBuilder {
        ReorganizeOptionsBuilder::default()
    }
}

/// Something the reorganize pass did or failed to do.
#[derive(Debug, Clone)]
pub enum ReorganizeEvent {
    /// A bucket's destination folder exists (or, in a dry run, would).
    FolderReady {
        extension: String,
        path: PathBuf,
        created: bool,
    },
    /// A bucket's destination folder could not be created; its files are skipped.
    FolderFailed {
        extension: String,
        error: OperationError,
    },
    /// A file was copied.
    Copied {
        source: PathBuf,
        destination: PathBuf,
        bytes: u64,
    },
    /// A file was left uncopied because of a conflict.
    Skipped {
        source: PathBuf,
        destination: PathBuf,
        reason: ConflictKind,
    },
    /// The indexed source no longer exists.
    SourceMissing { source: PathBuf },
    /// Copying a file failed.
    CopyFailed { error: OperationError },
}

/// Lazy reorganize pass over an [`ExtensionIndex`].
///
/// Buckets are visited in index order; within each bucket files are copied in
/// ascending name order. Each call to `next` performs at most one folder
/// creation or one copy. Sources are never moved or deleted.
#[derive(Debug)]
pub struct Reorganize<'a> {
    buckets: Buckets<'a>,
    current: Option<(PathBuf, RecordIter<'a>)>,
    destination: PathBuf,
    options: ReorganizeOptions,
    // Destinations a dry run has claimed in the current folder.
    planned: HashSet<PathBuf>,
}

impl<'a> Reorganize<'a> {
    /// Prepare a pass copying into `destination`.
    pub fn new(
        index: &'a ExtensionIndex,
        destination: impl Into<PathBuf>,
        options: ReorganizeOptions,
    ) -> Self {
        Self {
            buckets: index.buckets(),
            current: None,
            destination: destination.into(),
            options,
            planned: HashSet::new(),
        }
    }

    /// Root folder the per-extension folders are created in.
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

impl Iterator for Reorganize<'_> {
    type Item = ReorganizeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((folder, records)) = self.current.as_mut() {
                match records.next() {
                    Some(record) => {
                        return Some(copy_record(record, folder, &self.options, &mut self.planned));
                    }
                    None => self.current = None,
                }
                continue;
            }

            let bucket = self.buckets.next()?;
            self.planned.clear();
            let folder = self.destination.join(bucket.folder_name());
            let extension = bucket.extension().to_string();

            return Some(match ensure_folder(&folder, self.options.dry_run) {
                Ok(created) => {
                    self.current = Some((folder.clone(), bucket.tree().iter()));
                    ReorganizeEvent::FolderReady {
                        extension,
                        path: folder,
                        created,
                    }
                }
                Err(err) => ReorganizeEvent::FolderFailed {
                    extension,
                    error: OperationError::new(folder, format!("Failed to create directory: {err}")),
                },
            });
        }
    }
}

/// Run a full reorganize pass and summarize it.
pub fn reorganize(
    index: &ExtensionIndex,
    destination: impl Into<PathBuf>,
    options: ReorganizeOptions,
) -> ReorganizeSummary {
    reorganize_with(index, destination, options, |_| {})
}

/// Run a full reorganize pass, showing every event to `observer`.
pub fn reorganize_with<F>(
    index: &ExtensionIndex,
    destination: impl Into<PathBuf>,
    options: ReorganizeOptions,
    mut observer: F,
) -> ReorganizeSummary
where
    F: FnMut(&ReorganizeEvent),
{
    let mut summary = ReorganizeSummary::new(options.dry_run);
    let pass = Reorganize::new(index, destination, options);
    tracing::debug!(destination = %pass.destination().display(), "starting reorganize");

    for event in pass {
        log_event(&event);
        observer(&event);
        summary.record(event);
    }

    tracing::debug!("{}", summary.summary());
    summary
}

/// Create `folder` if needed. Returns whether it had to be created.
fn ensure_folder(folder: &Path, dry_run: bool) -> std::io::Result<bool> {
    if folder.is_dir() {
        return Ok(false);
    }
    if !dry_run {
        fs::create_dir_all(folder)?;
    }
    Ok(true)
}

fn copy_record(
    record: &FileRecord,
    folder: &Path,
    options: &ReorganizeOptions,
    planned: &mut HashSet<PathBuf>,
) -> ReorganizeEvent {
    let source = record.source_path().to_path_buf();
    if !source.exists() {
        return ReorganizeEvent::SourceMissing { source };
    }

    let taken = |path: &Path| path.exists() || planned.contains(path);

    let mut destination = folder.join(record.file_name());
    if taken(&destination) {
        if is_same_file(&source, &destination) {
            return ReorganizeEvent::Skipped {
                source,
                destination,
                reason: ConflictKind::SameFile,
            };
        }

        match options.conflict {
            ConflictResolution::Overwrite => {}
            ConflictResolution::Skip => {
                return ReorganizeEvent::Skipped {
                    source,
                    destination,
                    reason: ConflictKind::FileExists,
                };
            }
            ConflictResolution::AutoRename => {
                destination = auto_rename_path_with(&destination, taken);
            }
        }
    }

    if options.dry_run {
        planned.insert(destination.clone());
        return ReorganizeEvent::Copied {
            source,
            destination,
            bytes: record.size(),
        };
    }

    match fs::copy(&source, &destination) {
        Ok(bytes) => ReorganizeEvent::Copied {
            source,
            destination,
            bytes,
        },
        Err(err) => ReorganizeEvent::CopyFailed {
            error: OperationError::new(source, format!("Failed to copy: {err}")),
        },
    }
}

fn log_event(event: &ReorganizeEvent) {
    match event {
        ReorganizeEvent::FolderReady { path, created, .. } => {
            tracing::debug!(path = %path.display(), created, "folder ready");
        }
        ReorganizeEvent::FolderFailed { error, .. } => {
            tracing::warn!(path = %error.path.display(), "{}", error.message);
        }
        ReorganizeEvent::Copied {
            source,
            destination,
            bytes,
        } => {
            tracing::debug!(
                source = %source.display(),
                destination = %destination.display(),
                bytes,
                "copied"
            );
        }
        ReorganizeEvent::Skipped { source, reason, .. } => {
            tracing::info!(source = %source.display(), %reason, "skipped");
        }
        ReorganizeEvent::SourceMissing { source } => {
            tracing::warn!(source = %source.display(), "source no longer exists");
        }
        ReorganizeEvent::CopyFailed { error } => {
            tracing::warn!(path = %error.path.display(), "{}", error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn index_of(files: &[(&Path, &str)]) -> ExtensionIndex {
        let mut index = ExtensionIndex::new();
        for (path, ext) in files {
            let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            index.insert(ext, FileRecord::new(name, *ext, size, *path));
        }
        index
    }

    #[test]
    fn test_empty_index_does_nothing() {
        let temp = TempDir::new().unwrap();
        let index = ExtensionIndex::new();
        assert_eq!(Reorganize::new(&index, temp.path(), ReorganizeOptions::default()).count(), 0);
    }

    #[test]
    fn test_events_follow_tree_order() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let b = src.path().join("b.txt");
        let a = src.path().join("a.txt");
        fs::write(&b, "b").unwrap();
        fs::write(&a, "a").unwrap();

        let index = index_of(&[(b.as_path(), "txt"), (a.as_path(), "txt")]);
        let events: Vec<_> = Reorganize::new(&index, dest.path(), ReorganizeOptions::default()).collect();

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], ReorganizeEvent::FolderReady { created: true, .. }));
        let copied: Vec<_> = events[1..]
            .iter()
            .map(|e| match e {
                ReorganizeEvent::Copied { destination, .. } => destination.clone(),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        let folder = dest.path().join("txt_files");
        assert_eq!(copied, [folder.join("a.txt"), folder.join("b.txt")]);
    }

    #[test]
    fn test_missing_source_is_reported() {
        let dest = TempDir::new().unwrap();
        let mut index = ExtensionIndex::new();
        index.insert("txt", FileRecord::new("gone.txt", "txt", 4, "/nonexistent/extsort/gone.txt"));

        let events: Vec<_> = Reorganize::new(&index, dest.path(), ReorganizeOptions::default()).collect();
        assert!(matches!(&events[1], ReorganizeEvent::SourceMissing { source } if source.ends_with("gone.txt")));
        assert!(!dest.path().join("txt_files/gone.txt").exists());
    }

    #[test]
    fn test_folder_blocked_by_file() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let file = src.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        // A plain file where the folder should go
        fs::write(dest.path().join("txt_files"), "in the way").unwrap();

        let index = index_of(&[(file.as_path(), "txt")]);
        let events: Vec<_> = Reorganize::new(&index, dest.path(), ReorganizeOptions::default()).collect();

        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ReorganizeEvent::FolderFailed { extension, .. } if extension == "txt"));
    }

    #[test]
    fn test_copy_onto_itself_is_skipped() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("txt_files");
        fs::create_dir(&folder).unwrap();
        let file = folder.join("a.txt");
        fs::write(&file, "keep me").unwrap();

        let index = index_of(&[(file.as_path(), "txt")]);
        let events: Vec<_> = Reorganize::new(&index, temp.path(), ReorganizeOptions::default()).collect();

        assert!(matches!(
            &events[1],
            ReorganizeEvent::Skipped { reason: ConflictKind::SameFile, .. }
        ));
        assert_eq!(fs::read_to_string(&file).unwrap(), "keep me");
    }

    #[test]
    fn test_options_builder() {
        let options = ReorganizeOptions::builder()
            .conflict(ConflictResolution::Skip)
            .dry_run(true)
            .build()
            .unwrap();
        assert_eq!(options.conflict, ConflictResolution::Skip);
        assert!(options.dry_run);

        let defaults = ReorganizeOptions::builder().build().unwrap();
        assert_eq!(defaults.conflict, ConflictResolution::Overwrite);
        assert!(!defaults.dry_run);
    }
}
