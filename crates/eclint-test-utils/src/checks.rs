//! Fixture checks for engine and handler tests.
//!
//! Each check reads one editorconfig-style property and either reports
//! fixable findings, unfixable findings, or a content error.

use std::rc::Rc;

use eclint_core::{
    Check, CheckProvider, Edit, Error, Finding, FindingSink, PropertySet, ProvidedCheck, Resource,
    Result,
};

fn enabled(properties: &PropertySet, key: &str) -> bool {
    properties
        .get(key)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Deletes spaces and tabs before line ends when
/// `trim_trailing_whitespace = true`.
#[derive(Debug, Default)]
pub struct TrimTrailingWhitespace;

impl TrimTrailingWhitespace {
    pub const ID: &'static str = "trim-trailing-whitespace";
}

impl Check for TrimTrailingWhitespace {
    fn id(&self) -> &str {
        Self::ID
    }

    fn process(
        &self,
        resource: &Resource<'_>,
        properties: &PropertySet,
        sink: &mut dyn FindingSink,
    ) -> Result<()> {
        if !enabled(properties, "trim_trailing_whitespace") {
            return Ok(());
        }
        let mut line_start = 0;
        for line in resource.text().split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            let content = content.strip_suffix('\r').unwrap_or(content);
            let trimmed = content.trim_end_matches([' ', '\t']);
            if trimmed.len() < content.len() {
                let start = line_start + trimmed.len();
                let end = line_start + content.len();
                sink.report(
                    Finding::new(
                        Self::ID,
                        resource.location_of(start),
                        format!("Delete {} trailing whitespace characters", end - start),
                    )
                    .with_fix(Edit::delete(start..end)),
                );
            }
            line_start += line.len();
        }
        Ok(())
    }
}

/// Appends a line feed when `insert_final_newline = true`.
#[derive(Debug, Default)]
pub struct InsertFinalNewline;

impl InsertFinalNewline {
    pub const ID: &'static str = "insert-final-newline";
}

impl Check for InsertFinalNewline {
    fn id(&self) -> &str {
        Self::ID
    }

    fn process(
        &self,
        resource: &Resource<'_>,
        properties: &PropertySet,
        sink: &mut dyn FindingSink,
    ) -> Result<()> {
        let text = resource.text();
        if enabled(properties, "insert_final_newline") && !text.is_empty() && !text.ends_with('\n')
        {
            sink.report(
                Finding::new(
                    Self::ID,
                    resource.location_of(text.len()),
                    "Insert a final newline",
                )
                .with_fix(Edit::insert(text.len(), "\n")),
            );
        }
        Ok(())
    }
}

/// Reports tab indentation when `indent_style = space`, without a fix.
#[derive(Debug, Default)]
pub struct NoTabs;

impl NoTabs {
    pub const ID: &'static str = "indent-style";
}

impl Check for NoTabs {
    fn id(&self) -> &str {
        Self::ID
    }

    fn process(
        &self,
        resource: &Resource<'_>,
        properties: &PropertySet,
        sink: &mut dyn FindingSink,
    ) -> Result<()> {
        if properties.get("indent_style") != Some("space") {
            return Ok(());
        }
        let mut line_start = 0;
        for line in resource.text().split_inclusive('\n') {
            if line.starts_with('\t') {
                sink.report(Finding::new(
                    Self::ID,
                    resource.location_of(line_start),
                    "Indent with spaces instead of tabs",
                ));
            }
            line_start += line.len();
        }
        Ok(())
    }
}

/// Fails with a format error when the text contains `marker`.
#[derive(Debug)]
pub struct FailOnMarker {
    pub marker: &'static str,
}

impl FailOnMarker {
    pub const ID: &'static str = "fail-on-marker";
}

impl Check for FailOnMarker {
    fn id(&self) -> &str {
        Self::ID
    }

    fn process(&self, resource: &Resource<'_>, _: &PropertySet, _: &mut dyn FindingSink) -> Result<()> {
        match resource.text().find(self.marker) {
            Some(offset) => Err(Error::Format {
                file: resource.file().path().to_native(),
                check: Self::ID.to_string(),
                message: format!(
                    "unexpected '{}' at {}",
                    self.marker,
                    resource.location_of(offset)
                ),
            }),
            None => Ok(()),
        }
    }
}

/// Appends `!` on every pass, so a rewriting handler never converges.
#[derive(Debug, Default)]
pub struct NeverSatisfied;

impl NeverSatisfied {
    pub const ID: &'static str = "never-satisfied";
}

impl Check for NeverSatisfied {
    fn id(&self) -> &str {
        Self::ID
    }

    fn process(
        &self,
        resource: &Resource<'_>,
        _: &PropertySet,
        sink: &mut dyn FindingSink,
    ) -> Result<()> {
        let end = resource.text().len();
        sink.report(
            Finding::new(Self::ID, resource.location_of(end), "Needs more emphasis")
                .with_fix(Edit::insert(end, "!")),
        );
        Ok(())
    }
}

/// A [`CheckProvider`] over a fixed list of checks.
#[derive(Clone, Default)]
pub struct FixtureChecks {
    checks: Vec<ProvidedCheck>,
}

impl FixtureChecks {
    /// Trailing whitespace, final newline and tab indentation checks, in
    /// that order.
    pub fn standard() -> Self {
        Self::default()
            .with(ProvidedCheck::new(
                TrimTrailingWhitespace::ID,
                Rc::new(TrimTrailingWhitespace),
            ))
            .with(ProvidedCheck::new(
                InsertFinalNewline::ID,
                Rc::new(InsertFinalNewline),
            ))
            .with(ProvidedCheck::new(NoTabs::ID, Rc::new(NoTabs)))
    }

    pub fn with(mut self, check: ProvidedCheck) -> Self {
        self.checks.push(check);
        self
    }
}

impl CheckProvider for FixtureChecks {
    fn checks(&self) -> Vec<ProvidedCheck> {
        self.checks.clone()
    }
}
