//! Batch entry point
//!
//! [`run_batch`] wires the pieces together: registry from providers and
//! check entries, file selection, the handler for the mode, and the engine.

use std::rc::Rc;

use eclint_fs::{Encoding, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::args;
use crate::check::CheckProvider;
use crate::engine::{EngineOptions, LintEngine, Verdict};
use crate::logging::LintLogger;
use crate::message::Arg;
use crate::mode::Mode;
use crate::properties::{CachingResolver, PropertyResolver, PropertySet};
use crate::registry::{CheckConfig, CheckRegistry};
use crate::selection::{DEFAULT_INCLUDE, FileSelector};
use crate::Result;

/// Everything one check or format batch needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub base_dir: NormalizedPath,
    /// Default encoding; missing or empty falls back to UTF-8
    pub encoding: Option<String>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub exclude_non_source_files: bool,
    pub fail_on_no_matching_properties: bool,
    pub mode: Mode,
    pub checks: Vec<CheckConfig>,
    pub add_checks_from_providers: bool,
    pub max_passes: Option<usize>,
}

impl BatchRequest {
    /// A request with default settings.
    pub fn new(base_dir: NormalizedPath, mode: Mode) -> Self {
        Self {
            base_dir,
            encoding: Some(Encoding::Utf8.name().to_string()),
            includes: vec![DEFAULT_INCLUDE.to_string()],
            excludes: Vec::new(),
            exclude_non_source_files: true,
            fail_on_no_matching_properties: true,
            mode,
            checks: Vec::new(),
            add_checks_from_providers: true,
            max_passes: None,
        }
    }

    /// The selector these settings describe.
    pub fn selector(&self) -> FileSelector {
        FileSelector::new(
            self.includes.clone(),
            self.excludes.clone(),
            self.exclude_non_source_files,
        )
    }

    /// Compile the check registry.
    ///
    /// Provider checks are registered first when `add_checks_from_providers`
    /// is set; `checks` entries then add, replace or remove entries.
    pub fn registry(&self, providers: &[&dyn CheckProvider]) -> Result<CheckRegistry> {
        let mut builder = CheckRegistry::builder();
        for provider in providers {
            if self.add_checks_from_providers {
                builder.discover(*provider);
            } else {
                builder.provider(*provider);
            }
        }
        for config in &self.checks {
            builder.entry(config);
        }
        builder.build()
    }
}

/// Run one check or format batch.
///
/// Configuration errors abort before any file is read. Any error while
/// processing files aborts the batch.
pub fn run_batch(
    request: &BatchRequest,
    resolver: &dyn PropertyResolver,
    providers: &[&dyn CheckProvider],
    logger: Rc<LintLogger>,
) -> Result<Verdict> {
    let encoding = match request.encoding.as_deref().map(str::trim) {
        None | Some("") => {
            logger.warn(
                "No encoding configured, reading files as {}. Set 'encoding' to silence this warning.",
                args![Encoding::Utf8],
            );
            Encoding::Utf8
        }
        Some(name) => name.parse::<Encoding>()?,
    };

    let registry = request.registry(providers)?;
    let selector = request.selector();
    let files = selector.select(&request.base_dir)?;
    let ids: Vec<Arg> = registry.ids().into_iter().map(Arg::from).collect();
    logger.debug(
        "Selected {} files under '{}' for {} with checks {}",
        args![
            files.len(),
            &request.base_dir,
            Arg::display(request.mode.clone()),
            ids
        ],
    );

    let caching = CachingResolver::new(|path: &NormalizedPath, encoding: Encoding| -> Result<PropertySet> {
        resolver.resolve(path, encoding)
    });
    let engine = LintEngine::new(
        request.base_dir.clone(),
        encoding,
        registry,
        &caching,
        Rc::clone(&logger),
    )
    .with_options(EngineOptions {
        fail_on_no_matching_properties: request.fail_on_no_matching_properties,
        max_passes: request.max_passes,
    });

    let mut handler = request.mode.handler(logger);
    engine.run(&files, handler.as_mut())
}
