//! Shared test utilities for the eclint workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] scratch directory builder
//! - [`checks`]: small fixture checks and the [`FixtureChecks`] provider

pub mod checks;
pub mod tree;

pub use checks::{
    FailOnMarker, FixtureChecks, InsertFinalNewline, NeverSatisfied, NoTabs, TrimTrailingWhitespace,
};
pub use tree::TestTree;
