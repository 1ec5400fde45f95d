use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TreesimError;
use crate::types::{Language, Method};

/// Top-level configuration loaded from `.treesim.toml`.
///
/// Supports layered resolution: CLI flags > config file > defaults.
///
/// # Examples
///
/// ```
/// use treesim_core::{Method, TreesimConfig};
///
/// let config = TreesimConfig::default();
/// assert_eq!(config.method, Method::Ratio);
/// assert!(config.filter.exclude.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreesimConfig {
    /// Default comparison method (default: `ratio`).
    #[serde(default)]
    pub method: Method,
    /// Include/exclude glob patterns.
    #[serde(default)]
    pub filter: FilterConfig,
    /// Directory traversal settings.
    #[serde(default)]
    pub walk: WalkConfig,
    /// Extra extension → language mappings, e.g. `".pyi" = "python"`.
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

impl TreesimConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TreesimError::Io`] if the file cannot be read, or
    /// [`TreesimError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use treesim_core::TreesimConfig;
    /// use std::path::Path;
    ///
    /// let config = TreesimConfig::from_file(Path::new(".treesim.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, TreesimError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`TreesimError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use treesim_core::{Method, TreesimConfig};
    ///
    /// let toml = r#"
    /// method = "distance"
    /// [filter]
    /// exclude = ["tests/*"]
    /// "#;
    /// let config = TreesimConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.method, Method::Distance);
    /// assert_eq!(config.filter.exclude, vec!["tests/*"]);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, TreesimError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Resolve the `[languages]` table into typed overrides.
    ///
    /// # Errors
    ///
    /// Returns [`TreesimError::Config`] for a language name the engine does
    /// not know.
    pub fn language_overrides(&self) -> Result<Vec<(String, Language)>, TreesimError> {
        self.languages
            .iter()
            .map(|(ext, name)| {
                name.parse::<Language>()
                    .map(|lang| (ext.clone(), lang))
                    .map_err(|e| TreesimError::Config(format!("[languages] \"{ext}\": {e}")))
            })
            .collect()
    }
}

/// Glob patterns deciding which files take part in a comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Files matching any of these are skipped.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// When non-empty, only files matching one of these are compared.
    #[serde(default)]
    pub include: Vec<String>,
}

/// Directory traversal configuration.
///
/// # Examples
///
/// ```
/// use treesim_core::WalkConfig;
///
/// let walk = WalkConfig::default();
/// assert!(!walk.hidden);
/// assert!(!walk.gitignore);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Descend into dot-files and dot-directories such as `.git`.
    #[serde(default)]
    pub hidden: bool,
    /// Skip paths listed in `.gitignore` files.
    #[serde(default)]
    pub gitignore: bool,
}
