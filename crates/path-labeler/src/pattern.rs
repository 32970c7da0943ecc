//! # Path Patterns
//!
//! Wildcard patterns for matching changed-file paths.
//!
//! A pattern is translated to an anchored regular expression:
//!
//! - `**` matches any run of characters, including `/`
//! - `*` matches any run of characters except `/`
//! - `?` matches exactly one character
//!
//! Everything else is passed through to the regex engine untouched: `.`,
//! `+` and `(` keep their regex meaning, so `*.md` also matches `READMExmd`.
//! The one exception is a brace that does not start a counted repetition:
//! it stays literal, so `*.{js,ts}` is accepted but is not a brace expansion.
//!
//! ## Example
//!
//! ```
//! use path_labeler::PathPattern;
//!
//! # fn example() -> Result<(), path_labeler::PatternError> {
//! let pattern = PathPattern::new("docs/*.md")?;
//! assert!(pattern.matches("docs/readme.md"));
//! assert!(!pattern.matches("docs/guides/setup.md"));
//! # Ok(())
//! # }
//! ```

use std::fmt;

use regex::Regex;
use thiserror::Error;

/// A pattern whose translation is not a valid regular expression
#[derive(Debug, Error)]
#[error("invalid path pattern '{pattern}': {source}")]
pub struct PatternError {
    /// The pattern as written in the configuration
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// A compiled path pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the translated expression does not compile,
    /// e.g. an unbalanced `(` or `[` carried through from the pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&translate(pattern)).map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Check whether `path` matches the whole pattern
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The pattern as written
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Check a single path against a single pattern.
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern does not compile.
pub fn matches(path: &str, pattern: &str) -> Result<bool, PatternError> {
    Ok(PathPattern::new(pattern)?.matches(path))
}

/// Translate a wildcard pattern into an anchored regex.
///
/// A star pair is consumed before a lone star is considered, and the emitted
/// fragments are never rescanned. The anchors wrap the fragment without a
/// group, so a top-level `|` splits the anchors between its alternatives.
///
/// A brace that does not open a `{n}`, `{n,}` or `{n,m}` repetition is a
/// literal, so `*.{js,ts}` compiles and only matches the braces themselves.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                expr.push_str(".*");
                i += 1;
            }
            '*' => expr.push_str("[^/]*"),
            '?' => expr.push('.'),
            '\\' if matches!(chars.get(i + 1).copied(), Some('{' | '}')) => {
                expr.push('\\');
                expr.push(chars[i + 1]);
                i += 1;
            }
            '{' => match repetition_len(&chars[i..]) {
                Some(len) => {
                    expr.extend(&chars[i..i + len]);
                    i += len - 1;
                }
                None => expr.push_str("\\{"),
            },
            '}' => expr.push_str("\\}"),
            other => expr.push(other),
        }
        i += 1;
    }

    expr.push('$');
    expr
}

/// Length of a `{n}`, `{n,}` or `{n,m}` repetition at the start of `chars`
fn repetition_len(chars: &[char]) -> Option<usize> {
    let digits = |from: usize| {
        chars[from..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count()
    };

    let min = digits(1);
    if min == 0 {
        return None;
    }

    let mut end = 1 + min;
    if chars.get(end) == Some(&',') {
        end += 1;
        end += digits(end);
    }

    (chars.get(end) == Some(&'}')).then_some(end + 1)
}
