//! Core orchestration layer for eclint
//!
//! This crate drives editorconfig-style lint and format runs:
//!
//! - **Message formatting**: `{}` templates with array rendering and cycle
//!   detection, used for every diagnostic line
//! - **Check registry**: ordered checks with include/exclude scopes
//! - **Property resolution**: which properties apply to a file
//! - **Engine**: per-file pass loop until the outcome handler converges
//! - **Handlers**: report violations (check mode) or rewrite files (format mode)
//!
//! # Architecture
//!
//! ```text
//!            run_batch
//!                |
//!   FileSelector -> LintEngine -> OutcomeHandler
//!                   |        |
//!          PropertyResolver  CheckRegistry -> Check*
//!                |
//!            eclint-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use eclint_core::{BatchRequest, LintConfig, LintLogger, run_batch};
//! use eclint_fs::NormalizedPath;
//!
//! let base = NormalizedPath::canonical(".")?;
//! let config = LintConfig::load(&base.join("eclint.toml"))?;
//! let resolver = config.resolver(base.clone())?;
//! let verdict = run_batch(
//!     &config.check_request(base),
//!     &resolver,
//!     &[&my_checks],
//!     Rc::new(LintLogger::default()),
//! )?;
//! ```

pub mod batch;
pub mod check;
pub mod engine;
pub mod error;
pub mod handler;
pub mod logging;
pub mod message;
pub mod mode;
pub mod patterns;
pub mod properties;
pub mod registry;
pub mod selection;
pub mod settings;

pub use batch::{BatchRequest, run_batch};
pub use check::{
    Check, CheckProvider, Edit, FileRef, Finding, FindingSink, Location, ProvidedCheck, Resource,
};
pub use engine::{EngineOptions, FailureCause, FileOutcome, LintEngine, Verdict};
pub use error::{Error, Result};
pub use handler::{
    FormattingHandler, HandlerSummary, OutcomeHandler, RunState, ViolationCollector,
};
pub use logging::{LintLogger, LogLevel, LogSink, MemorySink, TracingSink};
pub use message::{Arg, ArgArray, Primitive, format_message};
pub use mode::Mode;
pub use properties::{CachingResolver, PropertyResolver, PropertySet, Section, SectionResolver};
pub use registry::{CheckConfig, CheckRegistry, CheckRegistryBuilder};
pub use selection::{DEFAULT_EXCLUDES, FileSelector};
pub use settings::LintConfig;
