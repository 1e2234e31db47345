//! File selection under a base directory

use std::collections::BTreeSet;

use eclint_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::patterns::compile_globset;
use crate::{Error, Result};

/// Patterns for version control metadata, build output and binary files.
///
/// Prepended to the excludes when non-source files are excluded.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // version control
    "**/.git/**",
    "**/.git",
    "**/.hg/**",
    "**/.svn/**",
    "**/.bzr/**",
    // build output and dependency caches
    "**/target/**",
    "**/build/**",
    "**/node_modules/**",
    "**/.gradle/**",
    "**/.idea/**",
    // binaries, archives and media
    "**/*.a",
    "**/*.bin",
    "**/*.class",
    "**/*.dll",
    "**/*.dylib",
    "**/*.exe",
    "**/*.o",
    "**/*.so",
    "**/*.jar",
    "**/*.war",
    "**/*.zip",
    "**/*.gz",
    "**/*.tgz",
    "**/*.tar",
    "**/*.7z",
    "**/*.rar",
    "**/*.bmp",
    "**/*.gif",
    "**/*.ico",
    "**/*.jpeg",
    "**/*.jpg",
    "**/*.png",
    "**/*.svgz",
    "**/*.webp",
    "**/*.mp3",
    "**/*.mp4",
    "**/*.ogg",
    "**/*.wav",
    "**/*.pdf",
    "**/*.doc",
    "**/*.docx",
    "**/*.xls",
    "**/*.xlsx",
    "**/*.ttf",
    "**/*.otf",
    "**/*.woff",
    "**/*.woff2",
    "**/*.bak",
];

/// Include-everything pattern used when no includes are configured.
pub const DEFAULT_INCLUDE: &str = "**";

/// Selects files below a base directory by include and exclude globs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelector {
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub exclude_non_source_files: bool,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self {
            includes: vec![DEFAULT_INCLUDE.to_string()],
            excludes: Vec::new(),
            exclude_non_source_files: true,
        }
    }
}

impl FileSelector {
    pub fn new(includes: Vec<String>, excludes: Vec<String>, exclude_non_source_files: bool) -> Self {
        Self {
            includes,
            excludes,
            exclude_non_source_files,
        }
    }

    /// Effective exclude list, defaults first.
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut excludes: Vec<String> = Vec::new();
        if self.exclude_non_source_files {
            excludes.extend(DEFAULT_EXCLUDES.iter().map(|p| p.to_string()));
        }
        for pattern in &self.excludes {
            if !excludes.contains(pattern) {
                excludes.push(pattern.clone());
            }
        }
        excludes
    }

    /// Files under `base`, relative to it, sorted and deduplicated.
    ///
    /// Symbolic links are neither followed nor selected. Format mode
    /// replaces files by rename, which would turn a linked file into a
    /// regular copy.
    pub fn select(&self, base: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
        let includes = if self.includes.is_empty() {
            compile_globset(&[DEFAULT_INCLUDE])?
        } else {
            compile_globset(&self.includes)?
        };
        let excludes = compile_globset(&self.effective_excludes())?;

        let mut selected = BTreeSet::new();
        for entry in WalkDir::new(base.to_native()).follow_links(false) {
            let entry = entry.map_err(|e| Error::Walk {
                path: base.to_native(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(relative) = NormalizedPath::new(entry.path()).strip_prefix(base) else {
                continue;
            };
            let rel = relative.as_str();
            if includes.is_match(rel) && !excludes.is_match(rel) {
                selected.insert(relative);
            }
        }

        tracing::debug!(base = %base, files = selected.len(), "selected files");
        Ok(selected.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> (TempDir, NormalizedPath) {
        let temp = TempDir::new().unwrap();
        for file in files {
            let path = temp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
        let base = NormalizedPath::canonical(temp.path()).unwrap();
        (temp, base)
    }

    fn names(paths: &[NormalizedPath]) -> Vec<&str> {
        paths.iter().map(|p| p.as_str()).collect()
    }

    #[test]
    fn test_select_sorted_with_default_excludes() {
        let (_temp, base) = tree(&[
            "b.txt",
            "a.txt",
            "src/c.rs",
            ".git/config",
            "target/debug/out.txt",
            "logo.png",
        ]);

        let selected = FileSelector::default().select(&base).unwrap();

        assert_eq!(names(&selected), vec!["a.txt", "b.txt", "src/c.rs"]);
    }

    #[test]
    fn test_select_without_default_excludes() {
        let (_temp, base) = tree(&["a.txt", "logo.png"]);
        let selector = FileSelector::new(vec!["**".into()], vec![], false);

        let selected = selector.select(&base).unwrap();

        assert_eq!(names(&selected), vec!["a.txt", "logo.png"]);
    }

    #[test]
    fn test_includes_and_excludes() {
        let (_temp, base) = tree(&["a.txt", "docs/b.txt", "docs/skip.txt", "c.md"]);
        let selector = FileSelector::new(
            vec!["**/*.txt".into()],
            vec!["docs/skip.txt".into()],
            true,
        );

        let selected = selector.select(&base).unwrap();

        assert_eq!(names(&selected), vec!["a.txt", "docs/b.txt"]);
    }

    #[test]
    fn test_invalid_pattern_fails_before_walking() {
        let selector = FileSelector::new(vec!["[".into()], vec![], true);
        let err = selector
            .select(&NormalizedPath::new("/does/not/exist"))
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_select_current_directory() {
        // Tests run from the package root
        let selector = FileSelector::new(vec!["Cargo.toml".into()], vec![], true);

        let selected = selector.select(&NormalizedPath::new(".")).unwrap();

        assert_eq!(names(&selected), vec!["Cargo.toml"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_skipped() {
        let (temp, base) = tree(&["a.txt"]);
        std::os::unix::fs::symlink(temp.path().join("a.txt"), temp.path().join("link.txt"))
            .unwrap();

        let selected = FileSelector::default().select(&base).unwrap();

        assert_eq!(names(&selected), vec!["a.txt"]);
    }

    #[test]
    fn test_user_excludes_are_deduplicated() {
        let selector = FileSelector::new(vec![], vec!["**/*.png".into()], true);
        let excludes = selector.effective_excludes();
        assert_eq!(excludes.iter().filter(|p| *p == "**/*.png").count(), 1);
    }
}
