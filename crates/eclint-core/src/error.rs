//! Error types for eclint-core

use std::path::PathBuf;

/// Result type for eclint-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a lint or format batch
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed run configuration, raised before any file is processed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An include or exclude glob that does not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A check configuration names an implementation nobody provides
    #[error("Unknown check implementation '{implementation}' for check '{id}'")]
    UnknownCheck { id: String, implementation: String },

    /// File content a check cannot work with
    #[error("\n\nFormat error in {file} (check '{check}'):\n\n    {message}\n\n")]
    Format {
        file: PathBuf,
        check: String,
        message: String,
    },

    /// The convergence loop hit its pass cap without the handler finishing
    #[error("{file} did not converge after {passes} passes")]
    NotConverged { file: PathBuf, passes: usize },

    /// Directory traversal failed during file selection
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Filesystem error from eclint-fs
    #[error(transparent)]
    Fs(#[from] eclint_fs::Error),
}

impl Error {
    /// Build a configuration error from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error stems from file content rather than I/O or setup.
    pub fn is_format_error(&self) -> bool {
        match self {
            Self::Format { .. } => true,
            Self::Fs(e) => e.is_content_error(),
            _ => false,
        }
    }

    /// Whether this error was raised while validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidPattern { .. } | Self::UnknownCheck { .. }
        )
    }
}
