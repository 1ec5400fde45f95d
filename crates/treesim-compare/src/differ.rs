//! Directory-tree comparison.
//!
//! Both trees are enumerated up front and keyed by path relative to their
//! own root, so identically named files in different directories are never
//! conflated. Matched pairs are normalized and scored on the rayon pool;
//! rows come back in key order, which keeps the report reproducible.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};
use treesim_core::{ComparisonResult, FileStatus, Method, Notice, TreesimError, WalkConfig};
use treesim_lang::{normalize, LanguageRegistry, NormalizedFile};

use crate::filter::{path_key, PathFilter};
use crate::score::score;

/// Rows and notices produced by one tree comparison.
#[derive(Debug, Clone, Default)]
pub struct DiffOutcome {
    /// Matched rows in key order, then added/removed rows in key order.
    pub results: Vec<ComparisonResult>,
    /// One notice per added or removed row, in row order.
    pub notices: Vec<Notice>,
}

/// Compares two directory trees file by file.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use treesim_compare::differ::TreeDiffer;
/// use treesim_compare::filter::PathFilter;
/// use treesim_core::Method;
/// use treesim_lang::LanguageRegistry;
///
/// let registry = LanguageRegistry::builtin();
/// let filter = PathFilter::allow_all();
/// let outcome = TreeDiffer::new(&registry, &filter, Method::Ratio)
///     .diff(Path::new("v1"), Path::new("v2"))
///     .unwrap();
/// for notice in &outcome.notices {
///     eprintln!("{notice}");
/// }
/// ```
pub struct TreeDiffer<'a> {
    registry: &'a LanguageRegistry,
    filter: &'a PathFilter,
    method: Method,
    walk: WalkConfig,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Original,
    Updated,
}

impl<'a> TreeDiffer<'a> {
    pub fn new(registry: &'a LanguageRegistry, filter: &'a PathFilter, method: Method) -> Self {
        Self {
            registry,
            filter,
            method,
            walk: WalkConfig::default(),
        }
    }

    /// Override traversal settings.
    pub fn with_walk(mut self, walk: WalkConfig) -> Self {
        self.walk = walk;
        self
    }

    /// Compare `original` against `updated`.
    ///
    /// Filtering runs before any file is read, so a
    /// [`TreesimError::ConflictingPatterns`] surfaces before scoring work.
    ///
    /// # Errors
    ///
    /// The first failure in key order aborts the run: unreadable files,
    /// unsupported extensions, language mismatches, or pattern conflicts.
    pub fn diff(&self, original: &Path, updated: &Path) -> Result<DiffOutcome, TreesimError> {
        let left = list_files(original, &self.walk)?;
        let right = list_files(updated, &self.walk)?;
        info!(
            original = left.len(),
            updated = right.len(),
            "enumerated trees"
        );

        let mut pairs = Vec::new();
        for (key, left_path) in &left {
            let Some(right_path) = right.get(key) else {
                continue;
            };
            if self.filter.is_excluded(left_path, Some(original))?
                || self.filter.is_excluded(right_path, Some(updated))?
            {
                debug!(%key, "excluded");
                continue;
            }
            pairs.push((key.as_str(), left_path.as_path(), right_path.as_path()));
        }

        let mut singles = Vec::new();
        for (key, path) in &left {
            if !right.contains_key(key) {
                singles.push((key.as_str(), Side::Original, path.as_path()));
            }
        }
        for (key, path) in &right {
            if !left.contains_key(key) {
                singles.push((key.as_str(), Side::Updated, path.as_path()));
            }
        }
        singles.sort_by(|a, b| a.0.cmp(b.0));

        let mut kept_singles = Vec::with_capacity(singles.len());
        for (key, side, path) in singles {
            let root = match side {
                Side::Original => original,
                Side::Updated => updated,
            };
            if self.filter.is_excluded(path, Some(root))? {
                debug!(%key, "excluded");
                continue;
            }
            kept_singles.push((key, side, path));
        }

        let matched: Vec<Result<ComparisonResult, TreesimError>> = pairs
            .par_iter()
            .map(|(key, left_path, right_path)| self.compare_files(key, left_path, right_path))
            .collect();
        let unmatched: Vec<Result<ComparisonResult, TreesimError>> = kept_singles
            .par_iter()
            .map(|(key, side, path)| self.single_side(key, *side, path))
            .collect();

        let mut results = matched.into_iter().collect::<Result<Vec<_>, _>>()?;
        let unmatched = unmatched.into_iter().collect::<Result<Vec<_>, _>>()?;

        let mut notices = Vec::with_capacity(unmatched.len());
        for row in &unmatched {
            let notice = match row.status {
                FileStatus::Added => Notice::Added(row.key.clone()),
                _ => Notice::Removed(row.key.clone()),
            };
            info!(key = notice.key(), "{notice}");
            notices.push(notice);
        }
        results.extend(unmatched);

        Ok(DiffOutcome { results, notices })
    }

    fn compare_files(
        &self,
        key: &str,
        left: &Path,
        right: &Path,
    ) -> Result<ComparisonResult, TreesimError> {
        let left = normalize(left, self.registry)?;
        let right = normalize(right, self.registry)?;
        compare_pair(key, &left, &right, self.method)
    }

    fn single_side(
        &self,
        key: &str,
        side: Side,
        path: &Path,
    ) -> Result<ComparisonResult, TreesimError> {
        let lines = normalize(path, self.registry)?.line_count();
        Ok(match side {
            Side::Original => ComparisonResult::removed(key, lines),
            Side::Updated => ComparisonResult::added(key, lines),
        })
    }
}

/// Score one matched pair of normalized files.
///
/// # Errors
///
/// Returns [`TreesimError::LanguageMismatch`] if the two files were
/// normalized as different languages; nothing is scored in that case.
///
/// # Examples
///
/// ```
/// use treesim_compare::differ::compare_pair;
/// use treesim_core::{Language, Method};
/// use treesim_lang::normalize_str;
///
/// let a = normalize_str("x = 1\n", Language::Python).unwrap();
/// let b = normalize_str("x = 1\ny = 2\n", Language::Python).unwrap();
/// let row = compare_pair("m.py", &a, &b, Method::Ratio).unwrap();
/// assert_eq!(row.line_delta, 1);
/// assert_eq!(row.lines, 2);
/// ```
pub fn compare_pair(
    key: &str,
    left: &NormalizedFile,
    right: &NormalizedFile,
    method: Method,
) -> Result<ComparisonResult, TreesimError> {
    if left.language() != right.language() {
        return Err(TreesimError::LanguageMismatch {
            key: key.to_string(),
            left: left.language(),
            right: right.language(),
        });
    }

    let s = score(&left.canonical_text(), &right.canonical_text(), method);
    debug!(%key, %method, similarity = s.similarity, "scored");

    Ok(ComparisonResult {
        key: key.to_string(),
        status: FileStatus::Matched,
        similarity: s.similarity,
        difference: s.difference,
        lines: right.line_count(),
        line_delta: right.line_count() as i64 - left.line_count() as i64,
    })
}

/// Enumerate regular files under `root`, keyed by `/`-separated relative path.
///
/// Symlinks are not followed. Hidden entries and `.gitignore` handling follow
/// `walk`.
///
/// # Errors
///
/// Returns [`TreesimError::Read`] if the root or any directory under it
/// cannot be read.
pub fn list_files(root: &Path, walk: &WalkConfig) -> Result<BTreeMap<String, PathBuf>, TreesimError> {
    if !root.is_dir() {
        return Err(TreesimError::Read {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(!walk.hidden)
        .git_ignore(walk.gitignore)
        .git_exclude(walk.gitignore)
        .parents(walk.gitignore)
        .require_git(false)
        .build();

    let mut files = BTreeMap::new();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        files.insert(path_key(relative), path.to_path_buf());
    }

    Ok(files)
}

/// Attribute a walk failure to the deepest path `ignore` reports, falling back
/// to `root`.
fn walk_error(root: &Path, err: ignore::Error) -> TreesimError {
    let path = failing_path(&err).unwrap_or(root).to_path_buf();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(message));
    TreesimError::Read { path, source }
}

fn failing_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, err } => {
            Some(failing_path(err).unwrap_or(path.as_path()))
        }
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            failing_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(failing_path),
        _ => None,
    }
}
