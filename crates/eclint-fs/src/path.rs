//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Glob patterns and diagnostics always see forward slashes; the
/// platform-native form is produced only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and drops `.` segments and
    /// repeated separators.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        let absolute = raw.starts_with('/');
        let segments: Vec<&str> = raw
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        let mut inner = segments.join("/");
        if absolute {
            inner.insert(0, '/');
        }
        Self { inner }
    }

    /// Resolve a directory to its canonical absolute form.
    ///
    /// Uses `dunce` so Windows paths come back without the `\\?\` prefix.
    pub fn canonical(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dunce::canonicalize(path)
            .map(Self::new)
            .map_err(|e| Error::io(path, e))
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    ///
    /// The empty path is the current directory.
    pub fn to_native(&self) -> PathBuf {
        if self.inner.is_empty() {
            return PathBuf::from(".");
        }
        PathBuf::from(&self.inner)
    }

    /// Join this path with a relative segment.
    pub fn join(&self, segment: impl AsRef<Path>) -> Self {
        let segment = Self::new(segment);
        if self.inner.is_empty() {
            return segment;
        }
        if segment.inner.is_empty() {
            return self.clone();
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment.inner.trim_start_matches('/'))
        } else {
            format!("{}/{}", self.inner, segment.inner.trim_start_matches('/'))
        };
        Self { inner: joined }
    }

    /// Express this path relative to `base`.
    ///
    /// Returns `None` when the path does not live under `base`.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<Self> {
        if base.inner.is_empty() {
            return Some(self.clone());
        }
        let rest = self.inner.strip_prefix(base.inner.as_str())?;
        if rest.is_empty() {
            return Some(Self {
                inner: String::new(),
            });
        }
        if base.inner.ends_with('/') {
            return Some(Self {
                inner: rest.to_string(),
            });
        }
        rest.strip_prefix('/').map(|r| Self {
            inner: r.to_string(),
        })
    }

    /// Append `suffix` to the file name, e.g. `a.txt` + `.bak` = `a.txt.bak`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            inner: format!("{}{}", self.inner, suffix),
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|n| !n.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        if self.inner.is_empty() {
            return Path::new(".");
        }
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.inner.is_empty() {
            return f.write_str(".");
        }
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<NormalizedPath> for String {
    fn from(path: NormalizedPath) -> Self {
        path.inner
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_separators() {
        assert_eq!(NormalizedPath::new("a\\b\\c.txt").as_str(), "a/b/c.txt");
        assert_eq!(NormalizedPath::new("/base//./src/").as_str(), "/base/src");
    }

    #[test]
    fn test_current_directory() {
        let here = NormalizedPath::new(".");
        assert_eq!(here.as_str(), "");
        assert_eq!(here.to_native(), PathBuf::from("."));
        assert_eq!(here.to_string(), ".");
        assert_eq!(here.join("a.txt").as_str(), "a.txt");

        let walked = NormalizedPath::new("./src/a.txt");
        assert_eq!(walked.strip_prefix(&here).unwrap().as_str(), "src/a.txt");
    }

    #[test]
    fn test_strip_prefix() {
        let base = NormalizedPath::new("/base");
        let file = NormalizedPath::new("/base/src/a.txt");
        assert_eq!(file.strip_prefix(&base).unwrap().as_str(), "src/a.txt");

        let sibling = NormalizedPath::new("/basement/a.txt");
        assert!(sibling.strip_prefix(&base).is_none());
    }

    #[test]
    fn test_with_suffix() {
        let file = NormalizedPath::new("/base/a.txt");
        assert_eq!(file.with_suffix(".bak").as_str(), "/base/a.txt.bak");
    }

    #[test]
    fn test_extension() {
        assert_eq!(NormalizedPath::new("src/a.txt").extension(), Some("txt"));
        assert_eq!(NormalizedPath::new("src/.editorconfig").extension(), None);
    }
}
