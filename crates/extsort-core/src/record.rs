//! File metadata records and extension extraction.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// How a filename whose only dot is the leading one (e.g. `.gitignore`) is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotfilePolicy {
    /// `.gitignore` has extension `gitignore`.
    #[default]
    AsExtension,
    /// `.gitignore` has no extension.
    NoExtension,
}

/// Extract the extension key from a filename.
///
/// The key is everything after the last `.`, without the dot. Names without a
/// dot, and names ending in a dot, have the empty key. A name whose only dot
/// is its first character is keyed according to `policy`.
///
/// ```
/// use extsort_core::{extension_of, DotfilePolicy};
///
/// assert_eq!(extension_of("a.tar.gz", DotfilePolicy::AsExtension), "gz");
/// assert_eq!(extension_of("README", DotfilePolicy::AsExtension), "");
/// assert_eq!(extension_of(".hidden", DotfilePolicy::AsExtension), "hidden");
/// assert_eq!(extension_of(".hidden", DotfilePolicy::NoExtension), "");
/// ```
pub fn extension_of(name: &str, policy: DotfilePolicy) -> &str {
    match name.rfind('.') {
        None => "",
        Some(0) if policy == DotfilePolicy::NoExtension => "",
        Some(idx) => &name[idx + 1..],
    }
}

/// Immutable snapshot of one discovered regular file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    name: CompactString,
    extension: CompactString,
    size: u64,
    source_path: PathBuf,
}

impl FileRecord {
    /// Create a record from its parts.
    pub fn new(
        name: impl Into<CompactString>,
        extension: impl Into<CompactString>,
        size: u64,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            size,
            source_path: source_path.into(),
        }
    }

    /// Create a record for `path`, deriving name and extension from its final
    /// component.
    ///
    /// Returns `None` if the path has no final component.
    pub fn from_path(path: &Path, size: u64, policy: DotfilePolicy) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        let extension = CompactString::new(extension_of(&name, policy));
        Some(Self::new(&*name, extension, size, path))
    }

    /// Full filename, including the extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filename exactly as it appears on disk.
    ///
    /// Unlike [`name`](Self::name), this is not lossily converted to UTF-8,
    /// so it is the name to copy under.
    pub fn file_name(&self) -> &OsStr {
        self.source_path
            .file_name()
            .unwrap_or_else(|| OsStr::new(self.name.as_str()))
    }

    /// Extension key (no leading dot, possibly empty).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Size in bytes at scan time.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Where the file lived when it was indexed.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of_last_dot() {
        assert_eq!(extension_of("a.tar.gz", DotfilePolicy::AsExtension), "gz");
        assert_eq!(extension_of("report.pdf", DotfilePolicy::AsExtension), "pdf");
    }

    #[test]
    fn test_extension_of_no_dot() {
        assert_eq!(extension_of("README", DotfilePolicy::AsExtension), "");
        assert_eq!(extension_of("README", DotfilePolicy::NoExtension), "");
    }

    #[test]
    fn test_extension_of_trailing_dot() {
        assert_eq!(extension_of("notes.", DotfilePolicy::AsExtension), "");
    }

    #[test]
    fn test_extension_of_leading_dot() {
        assert_eq!(extension_of(".hidden", DotfilePolicy::AsExtension), "hidden");
        assert_eq!(extension_of(".hidden", DotfilePolicy::NoExtension), "");
        // Only the leading dot is special
        assert_eq!(extension_of(".config.toml", DotfilePolicy::NoExtension), "toml");
    }

    #[test]
    fn test_record_from_path() {
        let record =
            FileRecord::from_path(Path::new("/tmp/x/.hidden"), 7, DotfilePolicy::AsExtension)
                .unwrap();
        assert_eq!(record.name(), ".hidden");
        assert_eq!(record.extension(), "hidden");
        assert_eq!(record.size(), 7);
        assert_eq!(record.source_path(), Path::new("/tmp/x/.hidden"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_name_keeps_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"a\xff.txt");
        let path = Path::new("/tmp/x").join(raw);
        let record = FileRecord::from_path(&path, 1, DotfilePolicy::AsExtension).unwrap();

        assert_eq!(record.file_name(), raw);
        assert_eq!(record.name(), "a\u{FFFD}.txt");
        assert_eq!(record.extension(), "txt");
    }

    #[test]
    fn test_record_from_root_path() {
        assert!(FileRecord::from_path(Path::new("/"), 0, DotfilePolicy::AsExtension).is_none());
    }
}
