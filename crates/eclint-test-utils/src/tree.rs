//! [`TestTree`] builder for file-tree test scenarios.

use std::fs;
use std::path::PathBuf;

use eclint_fs::NormalizedPath;
use tempfile::TempDir;

/// A temporary directory with helpers to lay out files and assert on them.
///
/// # Example
///
/// ```rust,no_run
/// use eclint_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write("src/a.txt", "hello  \n");
/// tree.assert_content("src/a.txt", "hello  \n");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
    root: NormalizedPath,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    ///
    /// The root is canonicalized so it compares equal to paths the file
    /// selector produces.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = NormalizedPath::canonical(temp_dir.path()).unwrap();
        Self { temp_dir, root }
    }

    /// Canonical root of the tree.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Native path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.temp_dir.path().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        self.write_bytes(rel, content.as_bytes())
    }

    pub fn write_bytes(&self, rel: &str, content: &[u8]) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("failed to read {}: {}", rel, e))
    }

    pub fn read_bytes(&self, rel: &str) -> Vec<u8> {
        fs::read(self.path(rel)).unwrap_or_else(|e| panic!("failed to read {}: {}", rel, e))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// Assert that `rel` exists.
    pub fn assert_file_exists(&self, rel: &str) {
        assert!(self.exists(rel), "expected file to exist: {}", rel);
    }

    /// Assert that `rel` does not exist.
    pub fn assert_file_missing(&self, rel: &str) {
        assert!(!self.exists(rel), "expected file to be absent: {}", rel);
    }

    /// Assert the exact content of `rel`.
    pub fn assert_content(&self, rel: &str, expected: &str) {
        assert_eq!(self.read(rel), expected, "unexpected content in {}", rel);
    }
}
