//! Scoped backup-then-write
//!
//! The original bytes are copied and synced to `<file><suffix>` before the
//! replacement is written. A failed write leaves the backup in place.

use std::fs::{self, File};
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{Error, NormalizedPath, Result, io};

/// Default suffix appended to a file name to form its backup name.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Whether and how to back up files before they are rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupPolicy {
    pub enabled: bool,
    pub suffix: String,
}

impl Default for BackupPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

impl BackupPolicy {
    /// A policy that backs up with the given suffix.
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            enabled: true,
            suffix: suffix.into(),
        }
    }

    /// Path the backup of `path` is written to.
    pub fn backup_path(&self, path: &NormalizedPath) -> NormalizedPath {
        path.with_suffix(&self.suffix)
    }
}

/// Replace the content of `path` with `content`, backing up the current
/// bytes first when the policy asks for it.
///
/// Returns the backup path if one was written.
pub fn store_with_backup(
    path: &NormalizedPath,
    content: &[u8],
    policy: &BackupPolicy,
) -> Result<Option<NormalizedPath>> {
    let backup = if policy.enabled && path.is_file() {
        let backup = policy.backup_path(path);
        copy_durably(path, &backup)?;
        tracing::debug!(path = %path, backup = %backup, "backed up file");
        Some(backup)
    } else {
        None
    };

    io::write_atomic(path, content)?;
    Ok(backup)
}

fn copy_durably(from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
    let original = io::read_bytes(from)?;
    let failed = |source: std::io::Error| Error::BackupFailed {
        path: from.to_native(),
        backup: to.to_native(),
        source,
    };
    let mut file = File::create(to.to_native()).map_err(failed)?;
    file.write_all(&original).map_err(failed)?;
    file.sync_all().map_err(failed)?;
    // Permissions are copied best-effort
    if let Ok(meta) = fs::metadata(from.to_native()) {
        let _ = fs::set_permissions(to.to_native(), meta.permissions());
    }
    Ok(())
}
