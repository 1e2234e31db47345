//! Filesystem layer for eclint
//!
//! Provides normalized path handling, text encodings, atomic writes with
//! scoped backups, and format-agnostic configuration loading.

pub mod backup;
pub mod config;
pub mod encoding;
pub mod error;
pub mod io;
pub mod path;

pub use backup::BackupPolicy;
pub use config::ConfigStore;
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use path::NormalizedPath;
