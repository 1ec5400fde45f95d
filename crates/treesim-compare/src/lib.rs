//! Tree diffing, similarity scoring, and report aggregation.
//!
//! Walks two snapshots of a source tree, classifies every file as matched,
//! added, or removed, scores matched pairs on their comment-free canonical
//! text, and rolls the rows up into a lines-of-code weighted total. Uses
//! `ignore` for walking, `glob` for include/exclude patterns, `rayon` for
//! per-file scoring, and `git2` to export revisions.

pub mod aggregate;
pub mod differ;
pub mod filter;
pub mod report;
pub mod score;
pub mod snapshot;

use std::path::Path;

use treesim_core::{TreesimConfig, TreesimError};
use treesim_lang::LanguageRegistry;

pub use aggregate::{aggregate, AggregateReport, TotalRow};
pub use differ::{compare_pair, DiffOutcome, TreeDiffer};
pub use filter::PathFilter;
pub use score::{score, Score};

/// Compare two directory trees and aggregate the result.
///
/// Method, filter patterns, traversal settings, and extension overrides all
/// come from `config`.
///
/// # Errors
///
/// Returns [`TreesimError::NoMatchingFiles`] when no file survives filtering,
/// or any error raised while walking, reading, or scoring.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use treesim_compare::compare_dirs;
/// use treesim_core::TreesimConfig;
///
/// let report = compare_dirs(Path::new("v1"), Path::new("v2"), &TreesimConfig::default()).unwrap();
/// println!("{report}");
/// ```
pub fn compare_dirs(
    original: &Path,
    updated: &Path,
    config: &TreesimConfig,
) -> Result<AggregateReport, TreesimError> {
    let registry = LanguageRegistry::with_overrides(config.language_overrides()?);
    let filter = PathFilter::new(&config.filter.exclude, &config.filter.include)?;

    let outcome = TreeDiffer::new(&registry, &filter, config.method)
        .with_walk(config.walk.clone())
        .diff(original, updated)?;

    aggregate(outcome.results, outcome.notices, config.method)
}
