//! Leveled diagnostic logging
//!
//! The engine and handlers log through an explicit [`LintLogger`] handle
//! rather than global macros. The handle filters by level before a template
//! is rendered, so disabled levels cost no formatting.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt as subscriber_fmt, prelude::*};

use crate::message::{Arg, format_message};

/// Severity of a diagnostic line, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(crate::Error::config(format!("unknown log level '{}'", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        };
        f.write_str(name)
    }
}

/// Destination for rendered diagnostic lines.
pub trait LogSink {
    fn emit(&self, level: LogLevel, message: &str);
}

/// Forwards lines to `tracing` events under the `eclint` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => tracing::error!(target: "eclint", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "eclint", "{}", message),
            LogLevel::Info => tracing::info!(target: "eclint", "{}", message),
            LogLevel::Debug => tracing::debug!(target: "eclint", "{}", message),
            LogLevel::Trace => tracing::trace!(target: "eclint", "{}", message),
        }
    }
}

/// Keeps every line in memory; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Rc<RefCell<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines with their levels, in emission order.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.lines.borrow().clone()
    }

    /// Captured lines formatted as `LEVEL message`.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .map(|(level, message)| format!("{} {}", level, message))
            .collect()
    }

    /// Captured messages at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&self, level: LogLevel, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

/// Level-filtering logger handle passed to the engine and handlers.
pub struct LintLogger {
    level: LogLevel,
    sink: Box<dyn LogSink>,
}

impl fmt::Debug for LintLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LintLogger")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl Default for LintLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info, TracingSink)
    }
}

impl LintLogger {
    pub fn new(level: LogLevel, sink: impl LogSink + 'static) -> Self {
        Self {
            level,
            sink: Box::new(sink),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether messages at `level` reach the sink.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    pub fn log(&self, level: LogLevel, template: &str, args: &[Arg]) {
        if self.is_enabled(level) {
            self.sink.emit(level, &format_message(template, args));
        }
    }

    pub fn error(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Error, template, args);
    }

    pub fn warn(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Warn, template, args);
    }

    pub fn info(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Info, template, args);
    }

    pub fn debug(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Debug, template, args);
    }

    pub fn trace(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Trace, template, args);
    }
}

/// Install a `tracing` subscriber printing to stdout.
///
/// The filter comes from `RUST_LOG`, defaulting to "info".
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = subscriber_fmt::layer()
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
