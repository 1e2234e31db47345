//! Batch outcome

use serde::{Deserialize, Serialize};

use crate::handler::HandlerSummary;

/// Why a batch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// Violations were found and the run fails on violations
    Violations,
    /// No selected file had any properties and the run fails on that
    NoMatchingProperties,
}

/// Outcome of a lint or format batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Files handed to the engine
    pub files_scanned: usize,
    /// Files with a non-empty property set
    pub files_matched: usize,
    /// Files with violations (check mode) or rewritten files (format mode)
    pub files_with_findings: usize,
    /// Violations found (check mode) or fixes applied (format mode)
    pub findings: usize,
    pub success: bool,
    pub cause: Option<FailureCause>,
    /// The handler's summary line
    pub summary: String,
}

impl Verdict {
    pub(crate) fn compose(
        files_scanned: usize,
        files_matched: usize,
        no_match_is_fatal: bool,
        summary: HandlerSummary,
    ) -> Self {
        let cause = if !summary.success {
            Some(FailureCause::Violations)
        } else if files_matched == 0 && no_match_is_fatal {
            Some(FailureCause::NoMatchingProperties)
        } else {
            None
        };
        Self {
            files_scanned,
            files_matched,
            files_with_findings: summary.files_affected,
            findings: summary.findings,
            success: cause.is_none(),
            cause,
            summary: summary.message,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn summary(success: bool, findings: usize) -> HandlerSummary {
        HandlerSummary {
            success,
            findings,
            files_affected: findings.min(1),
            message: "summary".to_string(),
        }
    }

    #[rstest]
    #[case(true, 0, 3, true, None)]
    #[case(true, 2, 3, true, None)]
    #[case(false, 2, 3, true, Some(FailureCause::Violations))]
    #[case(true, 0, 0, true, Some(FailureCause::NoMatchingProperties))]
    #[case(true, 0, 0, false, None)]
    fn test_compose(
        #[case] handler_success: bool,
        #[case] findings: usize,
        #[case] matched: usize,
        #[case] no_match_is_fatal: bool,
        #[case] expected: Option<FailureCause>,
    ) {
        let verdict = Verdict::compose(3, matched, no_match_is_fatal, summary(handler_success, findings));
        assert_eq!(verdict.cause, expected);
        assert_eq!(verdict.success, expected.is_none());
        assert_eq!(verdict.findings, findings);
    }
}
