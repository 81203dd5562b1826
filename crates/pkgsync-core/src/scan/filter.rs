//! Shell-style glob patterns used by the include/exclude filters
//!
//! Patterns follow `fnmatch` rules: `*` matches any run of characters
//! (including `/`), `?` matches exactly one character, `[seq]` matches one
//! character from `seq` and `[!seq]` one character outside it. Everything
//! else is literal. Patterns are compiled to anchored regular expressions.

use regex::Regex;

use crate::{Error, Result};

/// A single compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the translated expression cannot
    /// be compiled (for example when it exceeds the regex size limit).
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&translate(pattern)).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written in the settings.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Test a candidate string against the whole pattern.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// An ordered list of globs that matches when any member matches.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    globs: Vec<Glob>,
}

impl PatternSet {
    /// Compile every pattern in `patterns`.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let globs = patterns
            .into_iter()
            .map(|p| Glob::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { globs })
    }

    /// Whether any pattern matches `candidate`.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.globs.iter().any(|g| g.is_match(candidate))
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.globs.len()
    }

    /// The source patterns, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.globs.iter().map(Glob::as_str)
    }
}

/// Translate a glob into an anchored regular expression.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let n = chars.len();
    let mut out = String::from("(?s)^");
    let mut i = 0;

    while i < n {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                // Consecutive stars are equivalent to one
                while i < n && chars[i] == '*' {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => {
                let mut j = i;
                if j < n && chars[j] == '!' {
                    j += 1;
                }
                if j < n && chars[j] == ']' {
                    j += 1;
                }
                while j < n && chars[j] != ']' {
                    j += 1;
                }
                if j >= n {
                    // Unterminated class is a literal bracket
                    out.push_str("\\[");
                } else {
                    let mut body = &chars[i..j];
                    out.push('[');
                    if body.first() == Some(&'!') {
                        out.push('^');
                        body = &body[1..];
                    }
                    for &member in body {
                        if member == '-' {
                            out.push('-');
                        } else {
                            out.push_str(&regex::escape(&member.to_string()));
                        }
                    }
                    out.push(']');
                    i = j + 1;
                }
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }

    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*", "settings.json", true)]
    #[case("*", "snippets/rust.json", true)]
    #[case("*.json", "settings.json", true)]
    #[case("*.json", "keymaps/default.json", true)]
    #[case("*.json", "settings.json.bak", false)]
    #[case("*.sublime-*", "Preferences.sublime-settings", true)]
    #[case("*.sublime-*", "Default.sublime-keymap", true)]
    #[case("*.sublime-*", "notes.txt", false)]
    #[case("?.json", "a.json", true)]
    #[case("?.json", "ab.json", false)]
    #[case("[abc].json", "b.json", true)]
    #[case("[abc].json", "d.json", false)]
    #[case("[!abc].json", "d.json", true)]
    #[case("[!abc].json", "a.json", false)]
    #[case("[a-c]x", "bx", true)]
    #[case("[a-c]x", "dx", false)]
    #[case("settings.json", "settings.json", true)]
    #[case("settings.json", "settingsXjson", false)]
    #[case("[unterminated", "[unterminated", true)]
    #[case("a+b(c)", "a+b(c)", true)]
    #[case("Settings.json", "settings.json", false)]
    fn glob_matches_like_fnmatch(
        #[case] pattern: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let glob = Glob::new(pattern).unwrap();
        assert_eq!(
            glob.is_match(candidate),
            expected,
            "pattern {:?} against {:?} (regex {})",
            pattern,
            candidate,
            translate(pattern)
        );
    }

    #[test]
    fn pattern_set_matches_any() {
        let set = PatternSet::new(["*.json", "*.toml"]).unwrap();
        assert!(set.is_match("a.toml"));
        assert!(set.is_match("b.json"));
        assert!(!set.is_match("c.yaml"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_pattern_set_matches_nothing() {
        let set = PatternSet::new(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
        assert!(!set.is_match("anything"));
    }

    #[test]
    fn pattern_set_keeps_source_patterns() {
        let set = PatternSet::new(["*.json", ".git"]).unwrap();
        let patterns: Vec<&str> = set.patterns().collect();
        assert_eq!(patterns, vec!["*.json", ".git"]);
    }
}
