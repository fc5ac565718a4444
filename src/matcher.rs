//! Field name matching against configured patterns.

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;
use crate::types::DEFAULT_PATTERN;

/// Compiled, case-insensitive field name patterns.
///
/// A name matches when any pattern finds a match anywhere in it.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    patterns: Vec<Regex>,
}

impl FieldMatcher {
    /// Compile patterns. An empty list compiles the default pattern.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidPattern` for the first pattern with invalid syntax.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = patterns
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if compiled.is_empty() {
            compiled.push(compile(DEFAULT_PATTERN)?);
        }

        Ok(Self { patterns: compiled })
    }

    /// Returns true if any pattern matches part of `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }

    /// The source text of each compiled pattern, in configuration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}

fn compile(pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_case_insensitively() {
        let matcher = FieldMatcher::new([DEFAULT_PATTERN]).unwrap();
        assert!(matcher.matches("TimeStamp"));
        assert!(matcher.matches("CREATE_TIME"));
        assert!(matcher.matches("last_check_time"));
        assert!(!matcher.matches("identifier"));
    }

    #[test]
    fn multiple_patterns_union() {
        let matcher = FieldMatcher::new(["time", "date"]).unwrap();
        assert!(matcher.matches("createTime"));
        assert!(matcher.matches("birthDate"));
        assert!(!matcher.matches("userId"));
    }

    #[test]
    fn regex_syntax_is_honored() {
        let matcher = FieldMatcher::new(["^create.*time$"]).unwrap();
        assert!(matcher.matches("CreateTime"));
        assert!(matcher.matches("create_at_time"));
        assert!(!matcher.matches("update_time"));
        assert!(!matcher.matches("create_time_zone"));
    }

    #[test]
    fn empty_list_uses_default() {
        let matcher = FieldMatcher::new(Vec::<String>::new()).unwrap();
        assert_eq!(matcher.patterns().collect::<Vec<_>>(), vec!["time"]);
        assert!(matcher.matches("expiry_time"));
    }

    #[test]
    fn invalid_pattern_fails_fast() {
        let result = FieldMatcher::new(["time", "[unclosed"]);
        assert!(matches!(
            result,
            Err(PatternError::InvalidPattern { pattern, .. }) if pattern == "[unclosed"
        ));
    }

    #[test]
    fn patterns_preserve_order() {
        let matcher = FieldMatcher::new(["date", "time", "at$"]).unwrap();
        assert_eq!(
            matcher.patterns().collect::<Vec<_>>(),
            vec!["date", "time", "at$"]
        );
    }
}
