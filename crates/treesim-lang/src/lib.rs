//! Language detection, comment stripping, and line normalization.
//!
//! Turns a source file into its canonical text: comments removed with a
//! per-language regex rule, blank lines dropped. The canonical text is what
//! `treesim-compare` scores, which makes the comparison insensitive to
//! comment and whitespace-only edits.

pub mod normalize;
pub mod registry;
pub mod strip;

pub use normalize::{normalize, normalize_str, NormalizedFile};
pub use registry::LanguageRegistry;
pub use strip::{strip, CommentStyle};
