use std::collections::HashMap;
use std::path::Path;

use treesim_core::{Language, TreesimError};

/// Built-in extension table. Extensions are stored lowercase with the dot.
const BUILTIN_EXTENSIONS: &[(&str, Language)] = &[
    (".sol", Language::Solidity),
    (".rs", Language::Rust),
    (".py", Language::Python),
    (".vy", Language::Vyper),
    (".scilla", Language::Scilla),
];

/// Maps file extensions to languages.
///
/// Lookups are case-insensitive and accept the extension with or without its
/// leading dot. An extension missing from the table is an error, never a
/// silent skip.
///
/// # Examples
///
/// ```
/// use treesim_core::Language;
/// use treesim_lang::LanguageRegistry;
///
/// let registry = LanguageRegistry::builtin();
/// assert_eq!(registry.language_of(".sol").unwrap(), Language::Solidity);
/// assert_eq!(registry.language_of("RS").unwrap(), Language::Rust);
/// assert!(registry.language_of(".md").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    table: HashMap<String, Language>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageRegistry {
    /// Registry holding only the built-in extension table.
    pub fn builtin() -> Self {
        let table = BUILTIN_EXTENSIONS
            .iter()
            .map(|(ext, lang)| ((*ext).to_string(), *lang))
            .collect();
        Self { table }
    }

    /// Built-in table with `overrides` merged on top.
    ///
    /// # Examples
    ///
    /// ```
    /// use treesim_core::Language;
    /// use treesim_lang::LanguageRegistry;
    ///
    /// let registry = LanguageRegistry::with_overrides([("pyi".to_string(), Language::Python)]);
    /// assert_eq!(registry.language_of(".pyi").unwrap(), Language::Python);
    /// ```
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Language)>,
    {
        let mut registry = Self::builtin();
        for (ext, lang) in overrides {
            registry.table.insert(canonical_extension(&ext), lang);
        }
        registry
    }

    /// Resolve an extension such as `".py"` or `"py"`.
    ///
    /// # Errors
    ///
    /// Returns [`TreesimError::UnsupportedExtension`] if the extension is not
    /// in the table.
    pub fn language_of(&self, extension: &str) -> Result<Language, TreesimError> {
        self.table
            .get(&canonical_extension(extension))
            .copied()
            .ok_or_else(|| self.unsupported(extension.to_string(), None))
    }

    /// Resolve the language of `path` from its final suffix.
    ///
    /// A path without an extension is unsupported.
    ///
    /// # Errors
    ///
    /// Returns [`TreesimError::UnsupportedExtension`] carrying `path`.
    pub fn language_of_path(&self, path: &Path) -> Result<Language, TreesimError> {
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        self.language_of(&extension)
            .map_err(|_| self.unsupported(extension, Some(path)))
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.table.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    fn unsupported(&self, extension: String, path: Option<&Path>) -> TreesimError {
        TreesimError::UnsupportedExtension {
            extension,
            path: path.map(Path::to_path_buf),
            help: format!(
                "supported extensions: {}; exclude the file with --exclude, or map the \
                 extension under [languages] in .treesim.toml",
                self.extensions().join(", ")
            ),
        }
    }
}

fn canonical_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}
