//! Include/exclude glob filtering.
//!
//! Patterns are shell-style globs (`*`, `?`, `[...]`) compiled with the
//! `glob` crate. A pattern matches a file if it matches either the path
//! relative to its tree root or the bare file name, so `test_*.py` catches
//! tests in any directory while `tests/*` targets one directory.

use std::path::{Component, Path};

use treesim_core::TreesimError;

/// Compiled include/exclude pattern lists.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use treesim_compare::filter::PathFilter;
///
/// let filter = PathFilter::new(&["*_test.rs".to_string()], &[]).unwrap();
/// assert!(filter.is_excluded(Path::new("src/lib_test.rs"), None).unwrap());
/// assert!(!filter.is_excluded(Path::new("src/lib.rs"), None).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    exclude: Vec<glob::Pattern>,
    include: Vec<glob::Pattern>,
}

impl PathFilter {
    /// Compile `exclude` and `include` pattern lists.
    ///
    /// # Errors
    ///
    /// Returns [`TreesimError::InvalidPattern`] for a malformed glob.
    pub fn new(exclude: &[String], include: &[String]) -> Result<Self, TreesimError> {
        Ok(Self {
            exclude: compile_all(exclude)?,
            include: compile_all(include)?,
        })
    }

    /// A filter that lets every path through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Decide whether `path` is left out of the comparison.
    ///
    /// `relative_root`, when given and a prefix of `path`, is stripped before
    /// matching. With both lists empty nothing is excluded. With a non-empty
    /// include list, a path must match one include pattern to stay in.
    ///
    /// # Errors
    ///
    /// Returns [`TreesimError::ConflictingPatterns`] when the path matches an
    /// exclude pattern and an include pattern at the same time.
    pub fn is_excluded(
        &self,
        path: &Path,
        relative_root: Option<&Path>,
    ) -> Result<bool, TreesimError> {
        let relative = relative_root
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        self.is_key_excluded(&path_key(relative))
    }

    /// Same as [`PathFilter::is_excluded`] for an already relative,
    /// `/`-separated key.
    pub fn is_key_excluded(&self, key: &str) -> Result<bool, TreesimError> {
        if self.exclude.is_empty() && self.include.is_empty() {
            return Ok(false);
        }

        let file_name = key.rsplit('/').next().unwrap_or(key);
        let hits = |pattern: &&glob::Pattern| pattern.matches(key) || pattern.matches(file_name);

        let excluded_by = self.exclude.iter().find(hits);
        let included_by = self.include.iter().find(hits);

        match (excluded_by, included_by) {
            (Some(exclude), Some(include)) => Err(TreesimError::ConflictingPatterns {
                path: key.to_string(),
                exclude: exclude.as_str().to_string(),
                include: include.as_str().to_string(),
            }),
            (Some(_), None) => Ok(true),
            (None, Some(_)) => Ok(false),
            (None, None) => Ok(!self.include.is_empty()),
        }
    }
}

/// Decide exclusion from raw pattern lists.
///
/// Empty lists are valid and exclude nothing; callers never special-case
/// them.
///
/// # Errors
///
/// Returns [`TreesimError::InvalidPattern`] or
/// [`TreesimError::ConflictingPatterns`].
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use treesim_compare::filter::is_excluded;
///
/// assert!(!is_excluded(Path::new("a.py"), &[], &[], None).unwrap());
/// ```
pub fn is_excluded(
    path: &Path,
    exclude: &[String],
    include: &[String],
    relative_root: Option<&Path>,
) -> Result<bool, TreesimError> {
    PathFilter::new(exclude, include)?.is_excluded(path, relative_root)
}

/// Render a relative path as a `/`-separated key.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use treesim_compare::filter::path_key;
///
/// assert_eq!(path_key(Path::new("src/lib.rs")), "src/lib.rs");
/// ```
pub fn path_key(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn compile_all(patterns: &[String]) -> Result<Vec<glob::Pattern>, TreesimError> {
    patterns
        .iter()
        .map(|pat| {
            glob::Pattern::new(pat).map_err(|e| TreesimError::InvalidPattern {
                pattern: pat.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}
