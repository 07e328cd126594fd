//! Scan configuration types.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::index::DEFAULT_SLOT_COUNT;
use crate::record::DotfilePolicy;

/// Configuration for indexing a directory tree.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Number of slots in the extension index.
    #[builder(default = "DEFAULT_SLOT_COUNT")]
    #[serde(default = "default_slot_count")]
    pub slot_count: NonZeroUsize,

    /// How names like `.gitignore` are keyed.
    #[builder(default)]
    #[serde(default)]
    pub dotfile_policy: DotfilePolicy,

    /// Descend into symlinked directories. There is no cycle detection.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files and directories (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Entry names to skip. `*` is allowed at either end.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_slot_count() -> NonZeroUsize {
    DEFAULT_SLOT_COUNT
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a default config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            slot_count: DEFAULT_SLOT_COUNT,
            dotfile_policy: DotfilePolicy::default(),
            follow_symlinks: false,
            include_hidden: true,
            ignore_patterns: Vec::new(),
        }
    }

    /// Check if an entry name matches one of the ignore patterns.
    pub fn should_ignore(&self, name: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| {
            if let Some(prefix) = pattern.strip_suffix('*') {
                name.starts_with(prefix)
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name == pattern
            }
        })
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/home/user")
            .slot_count(NonZeroUsize::new(31).unwrap())
            .dotfile_policy(DotfilePolicy::NoExtension)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.slot_count.get(), 31);
        assert_eq!(config.dotfile_policy, DotfilePolicy::NoExtension);
        assert!(config.include_hidden);
    }

    #[test]
    fn test_config_builder_requires_root() {
        assert!(ScanConfig::builder().build().is_err());
        assert!(ScanConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_config_simple() {
        let config = ScanConfig::new("/home/user");
        assert_eq!(config.slot_count, DEFAULT_SLOT_COUNT);
        assert_eq!(config.dotfile_policy, DotfilePolicy::AsExtension);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_should_ignore() {
        let config = ScanConfig::builder()
            .root("/test")
            .ignore_patterns(vec![
                "node_modules".to_string(),
                "*.log".to_string(),
                "tmp*".to_string(),
            ])
            .build()
            .unwrap();

        assert!(config.should_ignore("node_modules"));
        assert!(config.should_ignore("build.log"));
        assert!(config.should_ignore("tmp_files"));
        assert!(!config.should_ignore("src"));
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut config = ScanConfig::new("/test");
        assert!(!config.should_skip_hidden(".git"));

        config.include_hidden = false;
        assert!(config.should_skip_hidden(".git"));
        assert!(!config.should_skip_hidden("src"));
    }
}
