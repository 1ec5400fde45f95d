use std::path::Path;

use tracing::debug;
use treesim_core::{Language, TreesimError};

use crate::registry::LanguageRegistry;
use crate::strip::strip;

/// A file reduced to its comment-free, non-blank lines.
///
/// # Examples
///
/// ```
/// use treesim_core::Language;
/// use treesim_lang::normalize_str;
///
/// let file = normalize_str("x = 1  # set\n\n# only a comment\ny = 2\n", Language::Python).unwrap();
/// assert_eq!(file.line_count(), 2);
/// assert_eq!(file.canonical_text(), "x = 1\ny = 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFile {
    lines: Vec<String>,
    language: Language,
}

impl NormalizedFile {
    /// Surviving lines, in file order. None of them is blank.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of surviving lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Language the file was normalized as.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Surviving lines joined with `\n`; the unit handed to the scorer.
    pub fn canonical_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Read `path`, resolve its language, and normalize its content.
///
/// # Errors
///
/// - [`TreesimError::UnsupportedExtension`] if the extension is unknown.
/// - [`TreesimError::Read`] if the file cannot be read or is not UTF-8.
/// - [`TreesimError::UnsupportedLanguage`] if no comment rule exists.
pub fn normalize(path: &Path, registry: &LanguageRegistry) -> Result<NormalizedFile, TreesimError> {
    let language = registry.language_of_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| TreesimError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = normalize_str(&content, language)?;
    debug!(
        path = %path.display(),
        %language,
        lines = file.line_count(),
        "normalized"
    );
    Ok(file)
}

/// Normalize in-memory `text` as `language`.
///
/// Comments are stripped, each line loses its trailing whitespace, and lines
/// that are then empty are dropped. Indentation is kept. `\n`, `\r\n` and a
/// lone `\r` all end a line.
///
/// # Errors
///
/// Returns [`TreesimError::UnsupportedLanguage`] if no comment rule exists.
pub fn normalize_str(text: &str, language: Language) -> Result<NormalizedFile, TreesimError> {
    let stripped = strip(language, text)?;
    let lines = stripped
        .split(['\n', '\r'])
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    Ok(NormalizedFile { lines, language })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn comment_only_change_gives_same_canonical_text() {
        let before = normalize_str("def f():\n    return 1\n", Language::Python).unwrap();
        let after = normalize_str("def f():\n    return 1  # comment\n", Language::Python).unwrap();
        assert_eq!(before.canonical_text(), after.canonical_text());
        assert_eq!(after.line_count(), 2);
    }

    #[test]
    fn no_blank_lines_survive() {
        let src = "fn a() {}\n\n   \n\t\n/* block\n\n */\n// line\nfn b() {}\r\n";
        let file = normalize_str(src, Language::Rust).unwrap();
        assert_eq!(file.lines(), ["fn a() {}", "fn b() {}"]);
        for line in file.lines() {
            assert!(!line.trim().is_empty());
        }
    }

    #[test]
    fn carriage_return_alone_ends_a_line() {
        let file = normalize_str("x = 1\ry = 2\r", Language::Python).unwrap();
        assert_eq!(file.lines(), ["x = 1", "y = 2"]);

        let mixed = normalize_str("a = 1\r\nb = 2\rc = 3\n", Language::Python).unwrap();
        assert_eq!(mixed.lines(), ["a = 1", "b = 2", "c = 3"]);
    }

    #[test]
    fn empty_input_has_zero_lines() {
        let file = normalize_str("", Language::Solidity).unwrap();
        assert_eq!(file.line_count(), 0);
        assert_eq!(file.canonical_text(), "");
    }

    #[test]
    fn indentation_is_preserved() {
        let file = normalize_str("if x:\n    y()\n", Language::Python).unwrap();
        assert_eq!(file.lines()[1], "    y()");
    }

    #[test]
    fn normalize_reads_and_detects_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.rs");
        fs::write(&path, "fn main() {}\n// trailing\n").unwrap();

        let file = normalize(&path, &LanguageRegistry::builtin()).unwrap();
        assert_eq!(file.language(), Language::Rust);
        assert_eq!(file.line_count(), 1);
    }

    #[test]
    fn unknown_extension_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let err = normalize(&path, &LanguageRegistry::builtin()).unwrap_err();
        assert!(matches!(err, TreesimError::UnsupportedExtension { .. }));
    }

    #[test]
    fn missing_file_is_read_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.py");
        let err = normalize(&path, &LanguageRegistry::builtin()).unwrap_err();
        match err {
            TreesimError::Read { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_utf8_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.py");
        fs::write(&path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();
        let err = normalize(&path, &LanguageRegistry::builtin()).unwrap_err();
        assert!(matches!(err, TreesimError::Read { .. }));
    }
}
