//! Orchestration engine
//!
//! For each selected file the engine resolves properties, filters the
//! registry, and runs the applicable checks pass after pass until the
//! outcome handler reports [`RunState::Finished`].

mod verdict;

pub use verdict::{FailureCause, Verdict};

use std::rc::Rc;

use eclint_fs::{Encoding, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::args;
use crate::check::{FileRef, Resource};
use crate::handler::{HandlerSink, OutcomeHandler, RunState};
use crate::logging::{LintLogger, LogLevel};
use crate::properties::PropertyResolver;
use crate::registry::CheckRegistry;
use crate::{Error, Result};

/// Options for [`LintEngine::run`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Fail the batch when no file has any properties
    pub fail_on_no_matching_properties: bool,
    /// Passes allowed per file. Defaults to the number of applicable
    /// checks plus one.
    pub max_passes: Option<usize>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            fail_on_no_matching_properties: true,
            max_passes: None,
        }
    }
}

/// What the engine did with one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// No properties apply; no check ran
    Skipped,
    /// Checks ran until the handler finished
    Processed { passes: usize },
}

/// Runs checks over files and feeds the findings to an outcome handler.
pub struct LintEngine<'r> {
    base_dir: NormalizedPath,
    default_encoding: Encoding,
    registry: CheckRegistry,
    resolver: &'r dyn PropertyResolver,
    logger: Rc<LintLogger>,
    options: EngineOptions,
}

impl std::fmt::Debug for LintEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintEngine")
            .field("base_dir", &self.base_dir)
            .field("default_encoding", &self.default_encoding)
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'r> LintEngine<'r> {
    /// Create an engine over `base_dir` with default options.
    pub fn new(
        base_dir: NormalizedPath,
        default_encoding: Encoding,
        registry: CheckRegistry,
        resolver: &'r dyn PropertyResolver,
        logger: Rc<LintLogger>,
    ) -> Self {
        Self {
            base_dir,
            default_encoding,
            registry,
            resolver,
            logger,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn base_dir(&self) -> &NormalizedPath {
        &self.base_dir
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run the pass loop for one file relative to the base directory.
    ///
    /// # Errors
    ///
    /// Propagates resolver, check and handler errors. Returns
    /// [`Error::NotConverged`] when the handler still asks for another pass
    /// after the pass cap.
    pub fn process_file(
        &self,
        relative: &NormalizedPath,
        handler: &mut dyn OutcomeHandler,
    ) -> Result<FileOutcome> {
        let path = self.base_dir.join(relative.as_str());
        self.logger.debug("Processing file '{}'", args![relative]);

        let properties = self.resolver.resolve(&path, self.default_encoding)?;
        if properties.is_empty() {
            self.logger.trace("No properties apply to '{}'", args![relative]);
            return Ok(FileOutcome::Skipped);
        }

        let encoding = properties.encoding_or(self.default_encoding)?;
        let file = FileRef::new(path, relative.clone(), encoding);
        let checks = self.registry.filter(relative);
        let max_passes = self
            .options
            .max_passes
            .unwrap_or(checks.len() + 1)
            .max(1);

        let mut state = RunState::Recheck;
        let mut passes = 0;
        while state != RunState::Finished {
            if passes == max_passes {
                return Err(Error::NotConverged {
                    file: file.path().to_native(),
                    passes,
                });
            }
            passes += 1;

            let text = handler.start_file(&file)?;
            let resource = Resource::new(&file, &text);
            let mut sink = HandlerSink(&mut *handler);
            for check in &checks {
                self.logger.trace(
                    "Processing file '{}' using check {}",
                    args![relative, check.id()],
                );
                check.process(&resource, &properties, &mut sink)?;
            }
            state = handler.end_file()?;
        }

        Ok(FileOutcome::Processed { passes })
    }

    /// Process `files` in order and compose the batch verdict.
    ///
    /// `handler.end_files` runs exactly once, also when no file matched.
    /// The first error aborts the batch.
    pub fn run(
        &self,
        files: &[NormalizedPath],
        handler: &mut dyn OutcomeHandler,
    ) -> Result<Verdict> {
        handler.start_files();

        let mut matched = 0;
        for relative in files {
            if let FileOutcome::Processed { .. } = self.process_file(relative, handler)? {
                matched += 1;
            }
        }

        let fatal = self.options.fail_on_no_matching_properties;
        if matched == 0 {
            let level = if fatal { LogLevel::Error } else { LogLevel::Warn };
            self.logger.log(
                level,
                "No .editorconfig properties applicable for files under '{}'",
                args![&self.base_dir],
            );
        }

        let summary = handler.end_files()?;
        Ok(Verdict::compose(files.len(), matched, fatal, summary))
    }
}
