use std::path::PathBuf;

use crate::types::Language;

/// Errors that can occur while comparing two source trees.
///
/// Library crates use this type directly; the binary crate renders it through
/// `miette` at the boundary. Every variant that concerns a single file
/// carries the offending path.
///
/// # Examples
///
/// ```
/// use treesim_core::TreesimError;
///
/// let err = TreesimError::Config("unknown method".into());
/// assert!(err.to_string().contains("unknown method"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TreesimError {
    /// The file extension has no entry in the language table.
    #[error(
        "unsupported file extension '{extension}'{}",
        .path.as_ref().map(|p| format!(" for {}", p.display())).unwrap_or_default()
    )]
    #[diagnostic(code(treesim::unsupported_extension))]
    UnsupportedExtension {
        /// The extension as given (may be empty).
        extension: String,
        /// File whose extension could not be resolved, when known.
        path: Option<PathBuf>,
        /// Registered extensions and how to add one.
        #[help]
        help: String,
    },

    /// No comment-stripping rule is registered for the language.
    #[error("unsupported language: {0}")]
    #[diagnostic(code(treesim::unsupported_language))]
    UnsupportedLanguage(Language),

    /// The same key resolved to different languages in the two trees.
    #[error("language mismatch for {key}: {left} in the original tree, {right} in the updated tree")]
    #[diagnostic(
        code(treesim::language_mismatch),
        help("a file was reused under the same path with an incompatible type; exclude it to continue")
    )]
    LanguageMismatch {
        /// Relative path shared by both files.
        key: String,
        /// Language of the original (left-hand) file.
        left: Language,
        /// Language of the updated (right-hand) file.
        right: Language,
    },

    /// Reading or decoding a source file failed.
    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(treesim::read))]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O or UTF-8 decode error.
        #[source]
        source: std::io::Error,
    },

    /// A path matched both an exclude and an include pattern.
    #[error("{path} matches exclude pattern '{exclude}' and include pattern '{include}'")]
    #[diagnostic(
        code(treesim::conflicting_patterns),
        help("narrow one of the patterns so that no file is both included and excluded")
    )]
    ConflictingPatterns {
        /// Relative path that matched both lists.
        path: String,
        /// The exclude pattern that matched.
        exclude: String,
        /// The include pattern that matched.
        include: String,
    },

    /// A glob pattern could not be compiled.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    #[diagnostic(code(treesim::invalid_pattern))]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Parser message.
        reason: String,
    },

    /// Neither tree produced a comparable file.
    #[error("no matching files found")]
    #[diagnostic(code(treesim::no_matching_files))]
    NoMatchingFiles,

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(treesim::config))]
    Config(String),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(treesim::toml))]
    Toml(#[from] toml::de::Error),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(treesim::serialization))]
    Serialization(#[from] serde_json::Error),

    /// Git operation failure.
    #[error("git error: {0}")]
    #[diagnostic(code(treesim::git))]
    Git(String),

    /// Filesystem I/O failure not tied to a single source file.
    #[error("IO error: {0}")]
    #[diagnostic(code(treesim::io))]
    Io(#[from] std::io::Error),
}
