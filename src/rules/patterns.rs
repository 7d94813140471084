//! Pattern matching for rules
//!
//! Provides glob-style matching of operation names. `*` matches any run of
//! characters (including none), `?` matches exactly one character, and every
//! other character matches itself. Globs are compiled to anchored regexes.

use regex::{Regex, RegexBuilder};
use std::fmt;
use tracing::warn;

/// Compiled size limit for one pattern (the `regex` crate's default)
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled rule pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    /// `None` when the glob exceeds the size limit; the pattern then only
    /// matches its own text
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self::compile(source.into(), REGEX_SIZE_LIMIT)
    }

    fn compile(source: String, size_limit: usize) -> Self {
        let regex = match RegexBuilder::new(&glob_to_regex(&source))
            .size_limit(size_limit)
            .build()
        {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(
                    pattern = %source,
                    error = %e,
                    "Pattern too large to compile, matching it literally"
                );
                None
            }
        };
        Self { source, regex }
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern contains a wildcard
    pub fn is_glob(&self) -> bool {
        self.source.contains(['*', '?'])
    }

    /// Check if an operation name matches this pattern
    pub fn matches(&self, name: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(name),
            None => self.source == name,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Check if `name` matches the glob `pattern`
pub fn matches(name: &str, pattern: &str) -> bool {
    Pattern::new(pattern).matches(name)
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push_str("(?s)^");
    let mut buf = [0u8; 4];
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}

/// An ordered list of compiled patterns
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
}

impl PatternMatcher {
    /// Compile a list of glob patterns
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Pattern::new).collect(),
        }
    }

    /// Create an empty pattern matcher (matches nothing)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if a name matches any pattern
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// Find the first pattern matching a name
    pub fn find_match(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches(name))
            .map(Pattern::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}
