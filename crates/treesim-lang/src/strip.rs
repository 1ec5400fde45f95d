//! Textual comment removal.
//!
//! Each [`Language`] is registered against a [`CommentStyle`] in a single
//! table; adding a language means adding one row there and one entry in the
//! extension table of [`crate::registry`].
//!
//! This is a regex transform, not a lexer. A comment delimiter inside a string
//! literal (`"http://example.com"`, `"# not a comment"`) is stripped like any
//! other comment. That approximation is accepted: it affects both trees the
//! same way, so similarity scores stay comparable.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use treesim_core::{Language, TreesimError};

/// Comment syntax family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* block */` and `// line` comments.
    Brace,
    /// `# line` comments and `'''` / `"""` docstring blocks.
    Hash,
    /// `(* block *)` comments, shortest match, no nesting.
    Scilla,
}

/// Comment rule for every supported language.
const RULES: &[(Language, CommentStyle)] = &[
    (Language::Solidity, CommentStyle::Brace),
    (Language::Rust, CommentStyle::Brace),
    (Language::Python, CommentStyle::Hash),
    (Language::Vyper, CommentStyle::Hash),
    (Language::Scilla, CommentStyle::Scilla),
];

impl CommentStyle {
    /// Look up the rule registered for `language`.
    pub fn for_language(language: Language) -> Option<Self> {
        RULES
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, style)| *style)
    }

    fn pattern(self) -> &'static Regex {
        static BRACE: OnceLock<Regex> = OnceLock::new();
        static HASH: OnceLock<Regex> = OnceLock::new();
        static SCILLA: OnceLock<Regex> = OnceLock::new();

        match self {
            CommentStyle::Brace => BRACE.get_or_init(|| compile(r"/\*[\s\S]*?\*/|//.*")),
            CommentStyle::Hash => {
                HASH.get_or_init(|| compile(r#"'''[\s\S]*?'''|"""[\s\S]*?"""|#.*"#))
            }
            CommentStyle::Scilla => SCILLA.get_or_init(|| compile(r"\(\*[\s\S]*?\*\)")),
        }
    }

    /// Remove every comment of this style from `text`.
    ///
    /// Removing a comment can splice its neighbours into a new delimiter
    /// (`(` + `(* x *)` + `* y *)`), so the pattern is reapplied until nothing
    /// matches. The result is therefore stable under a second call.
    pub fn strip(self, text: &str) -> String {
        let re = self.pattern();
        let mut current = text.to_string();
        loop {
            match re.replace_all(&current, "") {
                Cow::Borrowed(_) => return current,
                Cow::Owned(next) => current = next,
            }
        }
    }
}

// Patterns are literals checked by the tests below.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid comment pattern {pattern:?}: {e}"))
}

/// Strip comments from `text` according to the rule for `language`.
///
/// # Errors
///
/// Returns [`TreesimError::UnsupportedLanguage`] if no rule is registered.
///
/// # Examples
///
/// ```
/// use treesim_core::Language;
/// use treesim_lang::strip;
///
/// let out = strip(Language::Rust, "let x = 1; // one\n/* gone */fn f() {}").unwrap();
/// assert_eq!(out, "let x = 1; \nfn f() {}");
/// ```
pub fn strip(language: Language, text: &str) -> Result<String, TreesimError> {
    let style =
        CommentStyle::for_language(language).ok_or(TreesimError::UnsupportedLanguage(language))?;
    Ok(style.strip(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_a_rule() {
        for lang in Language::ALL {
            assert!(
                CommentStyle::for_language(lang).is_some(),
                "no comment rule for {lang}"
            );
        }
    }

    #[test]
    fn patterns_compile() {
        for style in [
            CommentStyle::Brace,
            CommentStyle::Hash,
            CommentStyle::Scilla,
        ] {
            let _ = style.pattern();
        }
    }

    #[test]
    fn brace_style_removes_line_and_block_comments() {
        let src = "pragma solidity ^0.8.0;\n/**\n * @title Token\n */\ncontract T { // body\n}\n";
        let out = strip(Language::Solidity, src).unwrap();
        assert_eq!(out, "pragma solidity ^0.8.0;\n\ncontract T { \n}\n");
    }

    #[test]
    fn block_comment_is_non_greedy() {
        let out = strip(Language::Rust, "a /* x */ b /* y */ c").unwrap();
        assert_eq!(out, "a  b  c");
    }

    #[test]
    fn hash_style_removes_trailing_and_full_line_comments() {
        let src = "# header\ndef f():\n    return 1  # one\n";
        let out = strip(Language::Python, src).unwrap();
        assert_eq!(out, "\ndef f():\n    return 1  \n");
    }

    #[test]
    fn python_docstrings_are_removed() {
        let src = "def f():\n    \"\"\"Doc\n    more\n    \"\"\"\n    x = '''a\nb'''\n    return x\n";
        let out = strip(Language::Python, src).unwrap();
        assert_eq!(out, "def f():\n    \n    x = \n    return x\n");
    }

    #[test]
    fn vyper_uses_hash_style() {
        let src = "@external\ndef foo() -> uint256:  # natspec\n    return 1\n";
        let out = strip(Language::Vyper, src).unwrap();
        assert_eq!(out, "@external\ndef foo() -> uint256:  \n    return 1\n");
    }

    #[test]
    fn scilla_block_comments_are_removed() {
        let src = "(* Multi\n   line *)\nlibrary Foo (* inline *)\nlet x = Uint32 1\n";
        let out = strip(Language::Scilla, src).unwrap();
        assert_eq!(out, "\nlibrary Foo \nlet x = Uint32 1\n");
    }

    #[test]
    fn scilla_comments_do_not_nest() {
        let out = strip(Language::Scilla, "a (* outer (* inner *) tail *) b").unwrap();
        assert_eq!(out, "a  tail *) b");
    }

    #[test]
    fn spliced_delimiters_are_stripped_too() {
        let out = strip(Language::Scilla, "a ((* c *)* y *) b").unwrap();
        assert_eq!(out, "a  b");
    }

    #[test]
    fn strip_is_idempotent() {
        let samples = [
            (Language::Rust, "fn main() { /* a */ let s = \"//\"; } // end\n"),
            (Language::Solidity, "/*/ odd */ uint x; /* ** */\n"),
            (Language::Python, "x = '''a'''  # c\n\"\"\"doc\"\"\"\n"),
            (Language::Scilla, "(* a *)(* b *) field f : Uint32 = Uint32 0\n"),
        ];
        for (lang, text) in samples {
            let once = strip(lang, text).unwrap();
            let twice = strip(lang, &once).unwrap();
            assert_eq!(once, twice, "strip not idempotent for {lang}");
        }
    }

    #[test]
    fn string_literals_are_not_protected() {
        let out = strip(Language::Rust, "let url = \"http://example.com\";").unwrap();
        assert_eq!(out, "let url = \"http:");
    }
}
