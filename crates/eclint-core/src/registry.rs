//! Check registry
//!
//! Built once per batch from providers and per-check configuration. The
//! registry answers which checks apply to a relative path, in registration
//! order.

use std::rc::Rc;

use eclint_fs::NormalizedPath;
use globset::GlobSet;
use serde::{Deserialize, Serialize};

use crate::check::{Check, CheckProvider, ProvidedCheck};
use crate::patterns::compile_globset;
use crate::{Error, Result};

/// Declarative configuration of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    pub id: String,
    /// Implementation name to resolve; defaults to `id`.
    #[serde(default)]
    pub implementation: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    /// A disabled entry removes any entry with the same id.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Prepend the implementation's default includes and excludes.
    #[serde(default = "default_true")]
    pub use_default_includes_and_excludes: bool,
}

fn default_true() -> bool {
    true
}

impl CheckConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            implementation: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            enabled: true,
            use_default_includes_and_excludes: true,
        }
    }

    pub fn disabled(id: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(id)
        }
    }

    fn implementation_name(&self) -> &str {
        self.implementation.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone)]
struct PendingEntry {
    id: String,
    implementation: String,
    includes: Vec<String>,
    excludes: Vec<String>,
    use_defaults: bool,
}

/// Collects implementations and entries, then compiles a [`CheckRegistry`].
#[derive(Debug, Default)]
pub struct CheckRegistryBuilder {
    catalog: Vec<ProvidedCheck>,
    entries: Vec<PendingEntry>,
}

impl CheckRegistryBuilder {
    /// Make a provider's implementations available to [`Self::entry`]
    /// without registering them.
    pub fn provider(&mut self, provider: &dyn CheckProvider) -> &mut Self {
        for provided in provider.checks() {
            self.add_to_catalog(provided);
        }
        self
    }

    /// Register every check a provider offers, with its default scope.
    pub fn discover(&mut self, provider: &dyn CheckProvider) -> &mut Self {
        for provided in provider.checks() {
            let entry = PendingEntry {
                id: provided.check.id().to_string(),
                implementation: provided.implementation.clone(),
                includes: Vec::new(),
                excludes: Vec::new(),
                use_defaults: true,
            };
            self.add_to_catalog(provided);
            self.upsert(entry);
        }
        self
    }

    /// Apply one configuration entry: add or replace it when enabled,
    /// remove it when disabled.
    pub fn entry(&mut self, config: &CheckConfig) -> &mut Self {
        if !config.enabled {
            return self.remove_entry(&config.id);
        }
        self.upsert(PendingEntry {
            id: config.id.clone(),
            implementation: config.implementation_name().to_string(),
            includes: config.includes.clone(),
            excludes: config.excludes.clone(),
            use_defaults: config.use_default_includes_and_excludes,
        });
        self
    }

    pub fn remove_entry(&mut self, id: &str) -> &mut Self {
        self.entries.retain(|e| e.id != id);
        self
    }

    /// Resolve implementations and compile scopes.
    ///
    /// Fails with a configuration error for unknown implementations or
    /// invalid patterns.
    pub fn build(&self) -> Result<CheckRegistry> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for pending in &self.entries {
            let provided = self
                .catalog
                .iter()
                .find(|p| p.implementation == pending.implementation)
                .ok_or_else(|| Error::UnknownCheck {
                    id: pending.id.clone(),
                    implementation: pending.implementation.clone(),
                })?;

            let (mut includes, mut excludes) = (Vec::new(), Vec::new());
            if pending.use_defaults {
                includes.extend(provided.default_includes.iter().cloned());
                excludes.extend(provided.default_excludes.iter().cloned());
            }
            includes.extend(pending.includes.iter().cloned());
            excludes.extend(pending.excludes.iter().cloned());

            entries.push(RegisteredCheck {
                id: pending.id.clone(),
                check: Rc::clone(&provided.check),
                includes: if includes.is_empty() {
                    None
                } else {
                    Some(compile_globset(&includes)?)
                },
                excludes: compile_globset(&excludes)?,
            });
        }
        Ok(CheckRegistry { entries })
    }

    fn add_to_catalog(&mut self, provided: ProvidedCheck) {
        match self
            .catalog
            .iter_mut()
            .find(|p| p.implementation == provided.implementation)
        {
            Some(existing) => *existing = provided,
            None => self.catalog.push(provided),
        }
    }

    fn upsert(&mut self, entry: PendingEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }
}

struct RegisteredCheck {
    id: String,
    check: Rc<dyn Check>,
    includes: Option<GlobSet>,
    excludes: GlobSet,
}

impl RegisteredCheck {
    fn applies_to(&self, relative: &str) -> bool {
        let included = self
            .includes
            .as_ref()
            .is_none_or(|set| set.is_match(relative));
        included && !self.excludes.is_match(relative)
    }
}

/// Ordered set of checks with their include/exclude scopes.
#[derive(Default)]
pub struct CheckRegistry {
    entries: Vec<RegisteredCheck>,
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

impl CheckRegistry {
    pub fn builder() -> CheckRegistryBuilder {
        CheckRegistryBuilder::default()
    }

    /// Checks applicable to `relative`, in registration order.
    pub fn filter(&self, relative: &NormalizedPath) -> Vec<Rc<dyn Check>> {
        self.entries
            .iter()
            .filter(|e| e.applies_to(relative.as_str()))
            .map(|e| Rc::clone(&e.check))
            .collect()
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
