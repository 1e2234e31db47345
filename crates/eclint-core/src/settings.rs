//! Run configuration file
//!
//! A `LintConfig` carries everything a batch needs besides the base
//! directory and the mode: selection globs, failure policy, backup policy,
//! per-check entries and the property sections.
//!
//! ```toml
//! encoding = "utf-8"
//! includes = ["**"]
//! excludes = ["vendor/**"]
//! fail_on_violation = true
//!
//! [[checks]]
//! id = "trim-trailing-whitespace"
//! excludes = ["**/*.md"]
//!
//! [[sections]]
//! pattern = "*.txt"
//! properties = { trim_trailing_whitespace = "true" }
//! ```

use eclint_fs::backup::DEFAULT_BACKUP_SUFFIX;
use eclint_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::batch::BatchRequest;
use crate::mode::Mode;
use crate::properties::{Section, SectionResolver};
use crate::registry::CheckConfig;
use crate::selection::DEFAULT_INCLUDE;
use crate::{Error, Result};

fn default_encoding() -> Option<String> {
    Some("utf-8".to_string())
}

fn default_includes() -> Vec<String> {
    vec![DEFAULT_INCLUDE.to_string()]
}

fn default_true() -> bool {
    true
}

fn default_backup_suffix() -> String {
    DEFAULT_BACKUP_SUFFIX.to_string()
}

/// Settings for check and format runs, loaded from TOML or JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Default encoding for files without a `charset` property
    #[serde(default = "default_encoding")]
    pub encoding: Option<String>,

    #[serde(default = "default_includes")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub excludes: Vec<String>,

    /// Skip VCS metadata, build output and binary files
    #[serde(default = "default_true")]
    pub exclude_non_source_files: bool,

    #[serde(default = "default_true")]
    pub fail_on_no_matching_properties: bool,

    /// Check mode only
    #[serde(default = "default_true")]
    pub fail_on_violation: bool,

    /// Format mode only
    #[serde(default)]
    pub backup: bool,

    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,

    /// Register every check the providers offer before applying `checks`
    #[serde(default = "default_true")]
    pub add_checks_from_providers: bool,

    #[serde(default)]
    pub max_passes: Option<usize>,

    #[serde(default)]
    pub checks: Vec<CheckConfig>,

    /// Property sections, later sections overriding earlier ones
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            includes: default_includes(),
            excludes: Vec::new(),
            exclude_non_source_files: true,
            fail_on_no_matching_properties: true,
            fail_on_violation: true,
            backup: false,
            backup_suffix: default_backup_suffix(),
            add_checks_from_providers: true,
            max_passes: None,
            checks: Vec::new(),
            sections: Vec::new(),
        }
    }
}

impl LintConfig {
    /// Load from a `.toml` or `.json` file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Parse TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Check-mode request over `base_dir`.
    pub fn check_request(&self, base_dir: NormalizedPath) -> BatchRequest {
        self.request(
            base_dir,
            Mode::Check {
                fail_on_violation: self.fail_on_violation,
            },
        )
    }

    /// Format-mode request over `base_dir`.
    pub fn format_request(&self, base_dir: NormalizedPath) -> BatchRequest {
        self.request(
            base_dir,
            Mode::Format {
                backup: self.backup,
                backup_suffix: self.backup_suffix.clone(),
            },
        )
    }

    /// Resolver over the configured sections, rooted at `root`.
    pub fn resolver(&self, root: NormalizedPath) -> Result<SectionResolver> {
        SectionResolver::new(root, &self.sections)
    }

    fn request(&self, base_dir: NormalizedPath, mode: Mode) -> BatchRequest {
        BatchRequest {
            base_dir,
            encoding: self.encoding.clone(),
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
            exclude_non_source_files: self.exclude_non_source_files,
            fail_on_no_matching_properties: self.fail_on_no_matching_properties,
            mode,
            checks: self.checks.clone(),
            add_checks_from_providers: self.add_checks_from_providers,
            max_passes: self.max_passes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(LintConfig::parse("").unwrap(), LintConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = LintConfig::parse(
            r#"
encoding = "latin1"
excludes = ["vendor/**"]
fail_on_violation = false
backup = true
backup_suffix = ".orig"
max_passes = 4

[[checks]]
id = "trim"
excludes = ["**/*.md"]

[[checks]]
id = "xml"
enabled = false

[[sections]]
pattern = "*.txt"
properties = { trim_trailing_whitespace = "true", charset = "utf-8", indent_size = "2" }
"#,
        )
        .unwrap();

        assert_eq!(config.encoding.as_deref(), Some("latin1"));
        assert_eq!(config.includes, vec!["**"]);
        assert_eq!(config.max_passes, Some(4));
        assert_eq!(config.checks.len(), 2);
        assert!(config.checks[0].enabled);
        assert!(!config.checks[1].enabled);
        assert_eq!(
            config.sections[0].properties.get("trim_trailing_whitespace"),
            Some(&"true".to_string())
        );
        let keys: Vec<_> = config.sections[0].properties.keys().collect();
        assert_eq!(keys, vec!["trim_trailing_whitespace", "charset", "indent_size"]);

        let check = config.check_request(NormalizedPath::new("/base"));
        assert_eq!(
            check.mode,
            Mode::Check {
                fail_on_violation: false
            }
        );
        let format = config.format_request(NormalizedPath::new("/base"));
        assert_eq!(
            format.mode,
            Mode::Format {
                backup: true,
                backup_suffix: ".orig".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_type_is_config_error() {
        let err = LintConfig::parse("fail_on_violation = \"maybe\"").unwrap_err();
        assert!(err.is_config_error());
    }
}
