//! Property sets and their resolution
//!
//! A [`PropertyResolver`] answers "which properties apply to this file".
//! An empty [`PropertySet`] means no configuration covers the file and the
//! engine skips it.

use std::cell::RefCell;
use std::collections::HashMap;

use eclint_fs::{Encoding, NormalizedPath};
use globset::{GlobBuilder, GlobMatcher};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Property selecting the text encoding of a file.
pub const CHARSET: &str = "charset";

/// Ordered key/value properties resolved for one file.
///
/// Keys are lowercased on insert; inserting an existing key replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    entries: Vec<(String, String)>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let key = key.as_ref().to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The encoding selected by [`CHARSET`], or `default` when absent.
    pub fn encoding_or(&self, default: Encoding) -> Result<Encoding> {
        match self.get(CHARSET) {
            Some(name) => Ok(name.parse()?),
            None => Ok(default),
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// Answers which properties apply to a file.
pub trait PropertyResolver {
    fn resolve(&self, path: &NormalizedPath, default_encoding: Encoding) -> Result<PropertySet>;
}

impl<F> PropertyResolver for F
where
    F: Fn(&NormalizedPath, Encoding) -> Result<PropertySet>,
{
    fn resolve(&self, path: &NormalizedPath, default_encoding: Encoding) -> Result<PropertySet> {
        self(path, default_encoding)
    }
}

/// A glob section granting properties to the files it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub pattern: String,
    /// Properties in declaration order
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

impl Section {
    pub fn new<I, K, V>(pattern: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pattern: pattern.into(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug)]
struct CompiledSection {
    matcher: GlobMatcher,
    properties: IndexMap<String, String>,
}

/// Resolves properties from in-memory glob sections rooted at a directory.
///
/// Sections apply in order, later ones overriding earlier keys. A pattern
/// without `/` matches the file name at any depth; a pattern with `/` is
/// anchored at the root.
#[derive(Debug)]
pub struct SectionResolver {
    root: NormalizedPath,
    sections: Vec<CompiledSection>,
}

impl SectionResolver {
    pub fn new(root: NormalizedPath, sections: &[Section]) -> Result<Self> {
        let sections = sections
            .iter()
            .map(|section| {
                Ok(CompiledSection {
                    matcher: compile_section_glob(&section.pattern)?,
                    properties: section.properties.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { root, sections })
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }
}

impl PropertyResolver for SectionResolver {
    fn resolve(&self, path: &NormalizedPath, _default_encoding: Encoding) -> Result<PropertySet> {
        let Some(relative) = path.strip_prefix(&self.root) else {
            return Ok(PropertySet::new());
        };
        let mut properties = PropertySet::new();
        for section in &self.sections {
            if section.matcher.is_match(relative.as_str()) {
                for (key, value) in &section.properties {
                    properties.insert(key, value.clone());
                }
            }
        }
        Ok(properties)
    }
}

fn compile_section_glob(pattern: &str) -> Result<GlobMatcher> {
    let anchored = match pattern.strip_prefix('/') {
        Some(rest) => rest.to_string(),
        None if pattern.contains('/') => pattern.to_string(),
        None => format!("**/{}", pattern),
    };
    GlobBuilder::new(&anchored)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Caches another resolver's answers per path for the lifetime of a batch.
pub struct CachingResolver<R> {
    inner: R,
    cache: RefCell<HashMap<(NormalizedPath, Encoding), PropertySet>>,
}

impl<R: PropertyResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct paths resolved so far.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<R: PropertyResolver> PropertyResolver for CachingResolver<R> {
    fn resolve(&self, path: &NormalizedPath, default_encoding: Encoding) -> Result<PropertySet> {
        let key = (path.clone(), default_encoding);
        if let Some(hit) = self.cache.borrow().get(&key) {
            return Ok(hit.clone());
        }
        let resolved = self.inner.resolve(path, default_encoding)?;
        self.cache.borrow_mut().insert(key, resolved.clone());
        Ok(resolved)
    }
}
