//! Error types for eclint-fs

use std::path::PathBuf;

/// Result type for eclint-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in eclint-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Unsupported encoding: {name}")]
    UnsupportedEncoding { name: String },

    #[error("Cannot decode {path} as {encoding}: {message}")]
    Decode {
        path: PathBuf,
        encoding: String,
        message: String,
    },

    #[error("Cannot encode content of {path} as {encoding}: {message}")]
    Encode {
        path: PathBuf,
        encoding: String,
        message: String,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Backup of {path} to {backup} failed: {source}")]
    BackupFailed {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error stems from file content rather than the filesystem.
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Encode { .. })
    }
}
