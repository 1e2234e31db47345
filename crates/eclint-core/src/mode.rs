//! Run modes
//!
//! A batch either reports violations ([`Mode::Check`]) or rewrites files to
//! fix them ([`Mode::Format`]). The mode only decides which outcome handler
//! the engine is given.

use std::fmt;
use std::rc::Rc;

use eclint_fs::BackupPolicy;
use eclint_fs::backup::DEFAULT_BACKUP_SUFFIX;
use serde::{Deserialize, Serialize};

use crate::handler::{FormattingHandler, OutcomeHandler, ViolationCollector};
use crate::logging::LintLogger;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Mode {
    Check {
        fail_on_violation: bool,
    },
    Format {
        backup: bool,
        backup_suffix: String,
    },
}

impl Default for Mode {
    fn default() -> Self {
        Self::check()
    }
}

impl Mode {
    /// Check mode failing on violations.
    pub fn check() -> Self {
        Self::Check {
            fail_on_violation: true,
        }
    }

    /// Format mode without backups.
    pub fn format() -> Self {
        Self::Format {
            backup: false,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// The outcome handler implementing this mode.
    pub fn handler(&self, logger: Rc<LintLogger>) -> Box<dyn OutcomeHandler> {
        match self {
            Self::Check { fail_on_violation } => {
                Box::new(ViolationCollector::new(logger, *fail_on_violation))
            }
            Self::Format {
                backup,
                backup_suffix,
            } => {
                let policy = BackupPolicy {
                    enabled: *backup,
                    suffix: backup_suffix.clone(),
                };
                Box::new(FormattingHandler::new(logger, policy))
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Check { .. } => write!(f, "check"),
            Self::Format { .. } => write!(f, "format"),
        }
    }
}
