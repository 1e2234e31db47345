//! Check-mode handler

use std::rc::Rc;

use eclint_fs::io;

use super::{HandlerSummary, OutcomeHandler, RunState, VIOLATION_TEMPLATE, violation_args};
use crate::Result;
use crate::args;
use crate::check::{FileRef, Finding, FindingSink};
use crate::logging::{LintLogger, LogLevel};
use crate::message::format_message;

/// Hint logged after the violation list.
pub const FIX_HINT: &str = "Run 'eclint format' to fix them automatically";

/// Collects findings without touching any file and reports them at the end
/// of the batch.
#[derive(Debug)]
pub struct ViolationCollector {
    logger: Rc<LintLogger>,
    fail_on_violation: bool,
    files_processed: usize,
    current: Option<FileRef>,
    pending: Vec<Finding>,
    violations: Vec<(FileRef, Vec<Finding>)>,
}

impl ViolationCollector {
    pub fn new(logger: Rc<LintLogger>, fail_on_violation: bool) -> Self {
        Self {
            logger,
            fail_on_violation,
            files_processed: 0,
            current: None,
            pending: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Findings collected so far, grouped per file in processing order.
    pub fn violations(&self) -> &[(FileRef, Vec<Finding>)] {
        &self.violations
    }

    pub fn violation_count(&self) -> usize {
        self.violations.iter().map(|(_, f)| f.len()).sum()
    }
}

impl FindingSink for ViolationCollector {
    fn report(&mut self, finding: Finding) {
        self.pending.push(finding);
    }
}

impl OutcomeHandler for ViolationCollector {
    fn start_files(&mut self) {
        self.files_processed = 0;
        self.violations.clear();
    }

    fn start_file(&mut self, file: &FileRef) -> Result<String> {
        if self.current.as_ref() != Some(file) {
            self.files_processed += 1;
            self.current = Some(file.clone());
        }
        Ok(io::read_text(file.path(), file.encoding())?)
    }

    fn end_file(&mut self) -> Result<RunState> {
        let findings = std::mem::take(&mut self.pending);
        if let Some(file) = self.current.take()
            && !findings.is_empty()
        {
            self.violations.push((file, findings));
        }
        Ok(RunState::Finished)
    }

    fn end_files(&mut self) -> Result<HandlerSummary> {
        let count = self.violation_count();
        let failing = count > 0 && self.fail_on_violation;
        let level = if failing { LogLevel::Error } else { LogLevel::Warn };

        for (file, findings) in &self.violations {
            for finding in findings {
                self.logger
                    .log(level, VIOLATION_TEMPLATE, &violation_args(file, finding));
            }
        }
        if count > 0 {
            self.logger.log(level, FIX_HINT, args![]);
        }

        let template = "Processed {} files, found {} violations in {} files";
        let summary_args = args![self.files_processed, count, self.violations.len()];
        self.logger.info(template, summary_args);

        Ok(HandlerSummary {
            success: !failing,
            findings: count,
            files_affected: self.violations.len(),
            message: format_message(template, summary_args),
        })
    }
}
