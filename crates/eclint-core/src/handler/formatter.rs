//! Format-mode handler

use std::rc::Rc;

use eclint_fs::{BackupPolicy, backup, io};

use super::{HandlerSummary, OutcomeHandler, RunState, violation_args};
use crate::args;
use crate::check::{Edit, FileRef, Finding, FindingSink};
use crate::logging::LintLogger;
use crate::message::format_message;
use crate::{Error, Result};

const UNFIXABLE_TEMPLATE: &str = "{}@{},{}: {} [{}] cannot be fixed automatically";

/// State of the file currently being formatted.
#[derive(Debug)]
struct Current {
    file: FileRef,
    original: String,
    text: String,
    queued: Vec<(String, Edit)>,
}

/// Applies the fixes findings carry and writes each changed file once,
/// after its last pass.
#[derive(Debug)]
pub struct FormattingHandler {
    logger: Rc<LintLogger>,
    backup: BackupPolicy,
    files_processed: usize,
    files_formatted: usize,
    fixes_applied: usize,
    current: Option<Current>,
}

impl FormattingHandler {
    pub fn new(logger: Rc<LintLogger>, backup: BackupPolicy) -> Self {
        Self {
            logger,
            backup,
            files_processed: 0,
            files_formatted: 0,
            fixes_applied: 0,
            current: None,
        }
    }
}

impl FindingSink for FormattingHandler {
    fn report(&mut self, finding: Finding) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        match finding.fix {
            Some(ref edit) => current.queued.push((finding.check.clone(), edit.clone())),
            None => {
                self.logger
                    .warn(UNFIXABLE_TEMPLATE, &violation_args(&current.file, &finding));
            }
        }
    }
}

impl OutcomeHandler for FormattingHandler {
    fn start_files(&mut self) {
        self.files_processed = 0;
        self.files_formatted = 0;
        self.fixes_applied = 0;
    }

    fn start_file(&mut self, file: &FileRef) -> Result<String> {
        if let Some(current) = &self.current
            && current.file == *file
        {
            return Ok(current.text.clone());
        }

        let text = io::read_text(file.path(), file.encoding())?;
        self.files_processed += 1;
        self.current = Some(Current {
            file: file.clone(),
            original: text.clone(),
            text: text.clone(),
            queued: Vec::new(),
        });
        Ok(text)
    }

    fn end_file(&mut self) -> Result<RunState> {
        let Some(current) = self.current.as_mut() else {
            return Ok(RunState::Finished);
        };

        let queued = std::mem::take(&mut current.queued);
        let (applied, deferred) = apply_edits(&current.file, &mut current.text, queued)?;
        self.fixes_applied += applied;
        if deferred > 0 {
            self.logger.debug(
                "Deferred {} overlapping fixes in '{}' to the next pass",
                args![deferred, current.file.relative()],
            );
        }
        if applied > 0 || deferred > 0 {
            return Ok(RunState::Recheck);
        }

        let Some(current) = self.current.take() else {
            return Ok(RunState::Finished);
        };
        if current.text != current.original {
            let bytes = current
                .file
                .encoding()
                .encode(&current.text, current.file.path().as_ref())?;
            let backup = backup::store_with_backup(current.file.path(), &bytes, &self.backup)?;
            if let Some(backup) = backup {
                self.logger
                    .debug("Backed up '{}' to '{}'", args![current.file.relative(), &backup]);
            }
            self.logger
                .info("Formatted '{}'", args![current.file.relative()]);
            self.files_formatted += 1;
        }
        Ok(RunState::Finished)
    }

    fn end_files(&mut self) -> Result<HandlerSummary> {
        let template = "Processed {} files, formatted {} files";
        let summary_args = args![self.files_processed, self.files_formatted];
        self.logger.info(template, summary_args);
        Ok(HandlerSummary {
            success: true,
            findings: self.fixes_applied,
            files_affected: self.files_formatted,
            message: format_message(template, summary_args),
        })
    }
}

/// Apply the non-overlapping subset of `queued` to `text`, back to front.
///
/// Edits are taken in report order; one overlapping an edit already taken
/// is deferred. Edits that leave the text unchanged are dropped before the
/// overlap test. Returns `(applied, deferred)`.
fn apply_edits(
    file: &FileRef,
    text: &mut String,
    queued: Vec<(String, Edit)>,
) -> Result<(usize, usize)> {
    let mut accepted: Vec<(String, Edit)> = Vec::with_capacity(queued.len());
    let mut deferred = 0;
    for (check, edit) in queued {
        let range = &edit.range;
        if range.start > range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return Err(Error::Format {
                file: file.path().to_native(),
                check,
                message: format!(
                    "fix range {}..{} is not valid for a text of {} bytes",
                    range.start,
                    range.end,
                    text.len()
                ),
            });
        }
        if text[range.clone()] == edit.replacement {
            continue;
        }
        if accepted.iter().any(|(_, a)| a.overlaps(&edit)) {
            deferred += 1;
            continue;
        }
        accepted.push((check, edit));
    }

    accepted.sort_by(|(_, a), (_, b)| b.range.start.cmp(&a.range.start));
    let applied = accepted.len();
    for (_, edit) in accepted {
        text.replace_range(edit.range, &edit.replacement);
    }
    Ok((applied, deferred))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Location;
    use crate::logging::{LogLevel, MemorySink};
    use eclint_fs::{Encoding, NormalizedPath};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn setup(content: &str) -> (TempDir, FileRef) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.txt");
        std::fs::write(&path, content).unwrap();
        let file = FileRef::new(
            NormalizedPath::new(&path),
            NormalizedPath::new("a.txt"),
            Encoding::Utf8,
        );
        (temp, file)
    }

    fn handler(backup: BackupPolicy) -> (FormattingHandler, MemorySink) {
        let sink = MemorySink::new();
        let logger = Rc::new(LintLogger::new(LogLevel::Debug, sink.clone()));
        (FormattingHandler::new(logger, backup), sink)
    }

    fn fix(range: std::ops::Range<usize>, replacement: &str) -> Finding {
        Finding::new("fixture", Location::new(1, 1), "fix me")
            .with_fix(Edit::replace(range, replacement))
    }

    #[test]
    fn test_applies_fix_and_writes_once() {
        let (_temp, file) = setup("ab  \ncd\n");
        let (mut handler, _sink) = handler(BackupPolicy::default());

        handler.start_files();
        assert_eq!(handler.start_file(&file).unwrap(), "ab  \ncd\n");
        handler.report(fix(2..4, ""));
        assert_eq!(handler.end_file().unwrap(), RunState::Recheck);

        // Nothing is written until the file converges
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "ab  \ncd\n");

        assert_eq!(handler.start_file(&file).unwrap(), "ab\ncd\n");
        assert_eq!(handler.end_file().unwrap(), RunState::Finished);
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "ab\ncd\n");

        let summary = handler.end_files().unwrap();
        assert!(summary.success);
        assert_eq!(summary.files_affected, 1);
        assert_eq!(summary.message, "Processed 1 files, formatted 1 files");
    }

    #[test]
    fn test_overlapping_fixes_are_deferred() {
        let (_temp, file) = setup("abcdef");
        let (mut handler, _sink) = handler(BackupPolicy::default());

        handler.start_file(&file).unwrap();
        handler.report(fix(0..3, "X"));
        handler.report(fix(2..4, "Y"));
        handler.report(fix(5..6, "Z"));
        assert_eq!(handler.end_file().unwrap(), RunState::Recheck);

        assert_eq!(handler.start_file(&file).unwrap(), "XdeZ");
    }

    #[test]
    fn test_noop_fix_finishes() {
        let (_temp, file) = setup("abc");
        let (mut handler, _sink) = handler(BackupPolicy::default());

        handler.start_file(&file).unwrap();
        handler.report(fix(0..1, "a"));
        assert_eq!(handler.end_file().unwrap(), RunState::Finished);
        assert_eq!(handler.end_files().unwrap().files_affected, 0);
    }

    #[test]
    fn test_noop_fix_does_not_shadow_overlapping_fix() {
        let (_temp, file) = setup("abc\n");
        let (mut handler, _sink) = handler(BackupPolicy::default());

        handler.start_file(&file).unwrap();
        handler.report(fix(0..1, "a"));
        handler.report(fix(0..1, "A"));
        assert_eq!(handler.end_file().unwrap(), RunState::Recheck);

        assert_eq!(handler.start_file(&file).unwrap(), "Abc\n");
        assert_eq!(handler.end_file().unwrap(), RunState::Finished);
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "Abc\n");
    }

    #[test]
    fn test_backup_holds_original_bytes() {
        let (_temp, file) = setup("x \n");
        let (mut handler, _sink) = handler(BackupPolicy::with_suffix(".orig"));

        handler.start_file(&file).unwrap();
        handler.report(fix(1..2, ""));
        handler.end_file().unwrap();
        handler.start_file(&file).unwrap();
        handler.end_file().unwrap();

        let backup = file.path().with_suffix(".orig");
        assert_eq!(std::fs::read_to_string(backup.to_native()).unwrap(), "x \n");
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "x\n");
    }

    #[test]
    fn test_unfixable_finding_is_warned() {
        let (_temp, file) = setup("abc");
        let (mut handler, sink) = handler(BackupPolicy::default());

        handler.start_file(&file).unwrap();
        handler.report(Finding::new("indent", Location::new(1, 1), "Bad indent"));
        assert_eq!(handler.end_file().unwrap(), RunState::Finished);

        assert_eq!(
            sink.messages_at(LogLevel::Warn),
            vec!["a.txt@1,1: Bad indent [indent] cannot be fixed automatically"]
        );
    }

    #[test]
    fn test_out_of_range_fix_is_format_error() {
        let (_temp, file) = setup("abc");
        let (mut handler, _sink) = handler(BackupPolicy::default());

        handler.start_file(&file).unwrap();
        handler.report(fix(2..10, ""));
        let err = handler.end_file().unwrap_err();
        assert!(err.is_format_error());
    }
}
