//! Error kind matching shared by the unwrap and exclude filters.

use regex::Regex;

/// Predicate over an error's kind name.
#[derive(Debug, Clone)]
pub enum KindMatcher {
    /// Exact kind name
    Exact(String),
    /// Regex pattern, unanchored
    Pattern(Regex),
}

impl KindMatcher {
    pub fn exact(kind: impl Into<String>) -> Self {
        KindMatcher::Exact(kind.into())
    }

    /// # Errors
    ///
    /// Returns error if the pattern is not a valid regex.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(KindMatcher::Pattern(Regex::new(pattern)?))
    }

    pub fn matches(&self, kind: &str) -> bool {
        match self {
            KindMatcher::Exact(name) => name == kind,
            KindMatcher::Pattern(regex) => regex.is_match(kind),
        }
    }

    /// Build matchers from exact names and regex patterns.
    pub fn from_lists(kinds: &[String], patterns: &[String]) -> Result<Vec<Self>, regex::Error> {
        let mut matchers: Vec<Self> = kinds.iter().map(|k| Self::exact(k.as_str())).collect();
        for pattern in patterns {
            matchers.push(Self::pattern(pattern)?);
        }
        Ok(matchers)
    }
}
