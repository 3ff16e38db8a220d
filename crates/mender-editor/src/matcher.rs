//! Literal-or-regex matching with mutually exclusive parameters

use mender_core::{Error, Result};
use regex::{NoExpand, Regex};

#[derive(Debug, Clone)]
pub enum LineMatcher {
    /// Exact substring (may span lines when used for replacement).
    Literal(String),
    /// Regular expression.
    Pattern(Regex),
}

impl LineMatcher {
    /// Build from a pair of optional parameters, exactly one of which must be
    /// set. `literal_name` names the literal parameter in error messages.
    pub fn from_params(literal: Option<&str>, pattern: Option<&str>, literal_name: &str) -> Result<Self> {
        match (literal, pattern) {
            (None, None) => Err(Error::invalid(format!(
                "Either `{literal_name}` or `pattern` must be specified"
            ))),
            (Some(_), Some(_)) => Err(Error::invalid(format!(
                "Cannot specify both `{literal_name}` and `pattern`"
            ))),
            (Some(text), None) => Ok(LineMatcher::Literal(text.to_string())),
            (None, Some(pattern)) => Regex::new(pattern)
                .map(LineMatcher::Pattern)
                .map_err(|e| Error::invalid(format!("Invalid pattern {pattern:?}: {e}"))),
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            LineMatcher::Literal(text) => haystack.contains(text.as_str()),
            LineMatcher::Pattern(regex) => regex.is_match(haystack),
        }
    }

    /// Replace every occurrence in `haystack`. The replacement is inserted
    /// verbatim for both kinds; `$` is never read as a capture reference.
    pub fn replace_all(&self, haystack: &str, replacement: &str) -> String {
        match self {
            LineMatcher::Literal(text) => haystack.replace(text.as_str(), replacement),
            LineMatcher::Pattern(regex) => regex.replace_all(haystack, NoExpand(replacement)).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_parameter() {
        assert!(matches!(
            LineMatcher::from_params(None, None, "search_text"),
            Err(Error::InvalidArgument(msg)) if msg.contains("search_text")
        ));
        assert!(matches!(
            LineMatcher::from_params(Some("a"), Some("b"), "old_str"),
            Err(Error::InvalidArgument(msg)) if msg.contains("Cannot specify both `old_str`")
        ));
        assert!(matches!(
            LineMatcher::from_params(None, Some("("), "old_str"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pattern_replacement_is_literal() {
        let matcher = LineMatcher::from_params(None, Some(r"foo(\d)"), "old_str").unwrap();
        assert_eq!(matcher.replace_all("foo1 foo2", "bar$1"), "bar$1 bar$1");
    }
}
