//! Checks and the findings they report
//!
//! A [`Check`] inspects one file's text for one pass and reports
//! [`Finding`]s to a [`FindingSink`]. Checks never write files themselves;
//! a finding may carry an [`Edit`] that the outcome handler can apply.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use eclint_fs::{Encoding, NormalizedPath};

use crate::Result;
use crate::properties::PropertySet;

/// A selected file: absolute path, path relative to the base directory and
/// the encoding its content is read with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: NormalizedPath,
    relative: NormalizedPath,
    encoding: Encoding,
}

impl FileRef {
    pub fn new(path: NormalizedPath, relative: NormalizedPath, encoding: Encoding) -> Self {
        Self {
            path,
            relative,
            encoding,
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn relative(&self) -> &NormalizedPath {
        &self.relative
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative)
    }
}

/// The content of a file as seen by the checks during one pass.
#[derive(Debug, Clone, Copy)]
pub struct Resource<'a> {
    file: &'a FileRef,
    text: &'a str,
}

impl<'a> Resource<'a> {
    pub fn new(file: &'a FileRef, text: &'a str) -> Self {
        Self { file, text }
    }

    pub fn file(&self) -> &'a FileRef {
        self.file
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// 1-based line and column of a byte offset into [`Resource::text`].
    ///
    /// Columns count characters, not bytes. Offsets past the end map to the
    /// position just after the last character.
    pub fn location_of(&self, offset: usize) -> Location {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &self.text[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Location { line, column }
    }
}

/// A 1-based position in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.line, self.column)
    }
}

/// Replacement of a byte range of the pass text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl Edit {
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::replace(range, "")
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    /// Whether two edits touch the same bytes. Two insertions at the same
    /// offset also overlap, since their order would be ambiguous.
    pub fn overlaps(&self, other: &Edit) -> bool {
        if self.range.start == other.range.start {
            return true;
        }
        self.range.start < other.range.end && other.range.start < self.range.end
    }
}

/// A violation reported by a check, optionally with its fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub check: String,
    pub location: Location,
    pub message: String,
    pub fix: Option<Edit>,
}

impl Finding {
    pub fn new(check: impl Into<String>, location: Location, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            location,
            message: message.into(),
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Edit) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// Receiver of findings while checks run.
pub trait FindingSink {
    fn report(&mut self, finding: Finding);
}

impl FindingSink for Vec<Finding> {
    fn report(&mut self, finding: Finding) {
        self.push(finding);
    }
}

/// A unit of validation logic run against one file per pass.
pub trait Check {
    /// Identifier used in configuration and diagnostics.
    fn id(&self) -> &str;

    /// Inspect `resource` and report findings to `sink`.
    ///
    /// Content the check cannot interpret should be reported as
    /// [`crate::Error::Format`].
    fn process(
        &self,
        resource: &Resource<'_>,
        properties: &PropertySet,
        sink: &mut dyn FindingSink,
    ) -> Result<()>;
}

/// A check offered by a [`CheckProvider`], with its default scope.
#[derive(Clone)]
pub struct ProvidedCheck {
    /// Implementation name configuration entries refer to.
    pub implementation: String,
    pub check: Rc<dyn Check>,
    pub default_includes: Vec<String>,
    pub default_excludes: Vec<String>,
}

impl ProvidedCheck {
    pub fn new(implementation: impl Into<String>, check: Rc<dyn Check>) -> Self {
        Self {
            implementation: implementation.into(),
            check,
            default_includes: Vec::new(),
            default_excludes: Vec::new(),
        }
    }

    pub fn with_includes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_includes = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_excludes = patterns.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for ProvidedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvidedCheck")
            .field("implementation", &self.implementation)
            .field("id", &self.check.id())
            .field("default_includes", &self.default_includes)
            .field("default_excludes", &self.default_excludes)
            .finish()
    }
}

/// A source of check implementations, scanned by the registry builder.
pub trait CheckProvider {
    fn checks(&self) -> Vec<ProvidedCheck>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> FileRef {
        FileRef::new(
            NormalizedPath::new("/base/a.txt"),
            NormalizedPath::new("a.txt"),
            Encoding::Utf8,
        )
    }

    #[test]
    fn test_location_of() {
        let file = file();
        let resource = Resource::new(&file, "ab\ncdé f\n");
        assert_eq!(resource.location_of(0), Location::new(1, 1));
        assert_eq!(resource.location_of(2), Location::new(1, 3));
        assert_eq!(resource.location_of(3), Location::new(2, 1));
        // byte 7 is the space after the two-byte 'é'
        assert_eq!(resource.location_of(7), Location::new(2, 4));
        assert_eq!(resource.location_of(100), Location::new(3, 1));
    }

    #[test]
    fn test_edit_overlap() {
        let a = Edit::delete(2..5);
        assert!(a.overlaps(&Edit::delete(4..6)));
        assert!(!a.overlaps(&Edit::delete(5..6)));
        assert!(Edit::insert(3, "x").overlaps(&Edit::insert(3, "y")));
        assert!(!Edit::insert(5, "x").overlaps(&a));
    }

    #[test]
    fn test_file_ref_displays_relative_path() {
        assert_eq!(file().to_string(), "a.txt");
    }
}
