use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Source language of a file, resolved from its extension.
///
/// # Examples
///
/// ```
/// use treesim_core::Language;
///
/// let lang: Language = "solidity".parse().unwrap();
/// assert_eq!(lang, Language::Solidity);
/// assert_eq!(lang.to_string(), "Solidity");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Solidity,
    Rust,
    Python,
    Vyper,
    Scilla,
}

impl Language {
    /// Every language known to the engine, in table order.
    pub const ALL: [Language; 5] = [
        Language::Solidity,
        Language::Rust,
        Language::Python,
        Language::Vyper,
        Language::Scilla,
    ];
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Solidity => write!(f, "Solidity"),
            Language::Rust => write!(f, "Rust"),
            Language::Python => write!(f, "Python"),
            Language::Vyper => write!(f, "Vyper"),
            Language::Scilla => write!(f, "Scilla"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "solidity" => Ok(Language::Solidity),
            "rust" => Ok(Language::Rust),
            "python" => Ok(Language::Python),
            "vyper" => Ok(Language::Vyper),
            "scilla" => Ok(Language::Scilla),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// String-distance algorithm used to score a pair of files.
///
/// # Examples
///
/// ```
/// use treesim_core::Method;
///
/// assert_eq!(Method::default(), Method::Ratio);
/// assert_eq!("distance".parse::<Method>().unwrap(), Method::Distance);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Indel-based similarity ratio over the combined length.
    #[default]
    Ratio,
    /// Levenshtein distance normalized by the longer text.
    Distance,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Ratio => write!(f, "ratio"),
            Method::Distance => write!(f, "distance"),
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ratio" => Ok(Method::Ratio),
            "distance" => Ok(Method::Distance),
            other => Err(format!("unknown method: {other} (expected ratio or distance)")),
        }
    }
}

/// Output format for the comparison report.
///
/// # Examples
///
/// ```
/// use treesim_core::OutputFormat;
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Where a file key was found across the two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Present in both trees and scored.
    Matched,
    /// Only present in the updated tree.
    Added,
    /// Only present in the original tree.
    Removed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Matched => write!(f, "matched"),
            FileStatus::Added => write!(f, "added"),
            FileStatus::Removed => write!(f, "removed"),
        }
    }
}

/// One row of the comparison report.
///
/// `lines` is the non-empty, comment-free line count of the updated version
/// (of the original version for removed files). `line_delta` is updated
/// minus original.
///
/// # Examples
///
/// ```
/// use treesim_core::{ComparisonResult, FileStatus};
///
/// let row = ComparisonResult::added("src/new.rs", 12);
/// assert_eq!(row.status, FileStatus::Added);
/// assert_eq!(row.similarity, 0.0);
/// assert_eq!(row.line_delta, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Path relative to the tree root, `/`-separated.
    pub key: String,
    /// Classification of the key across the two trees.
    pub status: FileStatus,
    /// Similarity in `[0, 100]`.
    pub similarity: f64,
    /// `100 - similarity`.
    pub difference: f64,
    /// Normalized line count (see type docs).
    pub lines: usize,
    /// Signed change in normalized line count.
    pub line_delta: i64,
}

impl ComparisonResult {
    /// Row for a file only present in the updated tree.
    pub fn added(key: impl Into<String>, lines: usize) -> Self {
        Self {
            key: key.into(),
            status: FileStatus::Added,
            similarity: 0.0,
            difference: 100.0,
            lines,
            line_delta: lines as i64,
        }
    }

    /// Row for a file only present in the original tree.
    pub fn removed(key: impl Into<String>, lines: usize) -> Self {
        Self {
            key: key.into(),
            status: FileStatus::Removed,
            similarity: 0.0,
            difference: 100.0,
            lines,
            line_delta: -(lines as i64),
        }
    }
}

/// Human-readable notice about a file present on only one side.
///
/// # Examples
///
/// ```
/// use treesim_core::Notice;
///
/// let notice = Notice::Removed("old.py".into());
/// assert_eq!(notice.to_string(), "old.py removed in the updated version.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "key")]
pub enum Notice {
    Added(String),
    Removed(String),
}

impl Notice {
    /// Key of the file the notice is about.
    pub fn key(&self) -> &str {
        match self {
            Notice::Added(key) | Notice::Removed(key) => key,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Added(key) => write!(f, "{key} is a new file in the updated version."),
            Notice::Removed(key) => write!(f, "{key} removed in the updated version."),
        }
    }
}
