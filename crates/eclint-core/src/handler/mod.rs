//! Outcome handlers
//!
//! An [`OutcomeHandler`] decides what happens with the findings the checks
//! report: [`ViolationCollector`] reports them, [`FormattingHandler`] applies
//! their fixes. The engine drives both through the same calls:
//!
//! ```text
//! start_files
//!   for each file with properties:
//!     start_file -> report* -> end_file   (repeated while Recheck)
//! end_files
//! ```

mod collector;
mod formatter;

pub use collector::ViolationCollector;
pub use formatter::FormattingHandler;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::check::{FileRef, Finding, FindingSink};
use crate::message::Arg;

/// Whether the engine must run another pass over the current file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Recheck,
    Finished,
}

/// What a handler reports once the batch is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSummary {
    /// False when the handler considers the batch failed
    pub success: bool,
    /// Findings reported (check mode) or fixes applied (format mode)
    pub findings: usize,
    /// Files with violations (check mode) or rewritten files (format mode)
    pub files_affected: usize,
    /// Human-readable summary line
    pub message: String,
}

/// Receives check findings and drives the per-file pass loop.
pub trait OutcomeHandler: FindingSink {
    /// Called once before the first file.
    fn start_files(&mut self) {}

    /// Called before every pass over `file`; returns the text the checks
    /// see during that pass.
    fn start_file(&mut self, file: &FileRef) -> Result<String>;

    /// Called after every pass over the current file.
    fn end_file(&mut self) -> Result<RunState>;

    /// Called exactly once after the last file.
    fn end_files(&mut self) -> Result<HandlerSummary>;
}

/// Routes findings from checks into the handler.
pub(crate) struct HandlerSink<'h>(pub(crate) &'h mut dyn OutcomeHandler);

impl FindingSink for HandlerSink<'_> {
    fn report(&mut self, finding: Finding) {
        self.0.report(finding);
    }
}

/// `{relative-path}@{line},{column}: {message} [{check-id}]`
const VIOLATION_TEMPLATE: &str = "{}@{},{}: {} [{}]";

fn violation_args(file: &FileRef, finding: &Finding) -> Vec<Arg> {
    vec![
        Arg::from(file.relative()),
        Arg::from(finding.location.line),
        Arg::from(finding.location.column),
        Arg::from(finding.message.as_str()),
        Arg::from(finding.check.as_str()),
    ]
}
