//! Include/exclude filtering of repository names.

use regex::Regex;

use crate::error::ConfigError;

/// Default include pattern: every name.
pub const DEFAULT_INCLUDE: &str = ".*";

/// Default exclude pattern: only the empty name, which never occurs.
pub const DEFAULT_EXCLUDE: &str = "^$";

/// A compiled include/exclude pair.
///
/// A name passes when the include pattern matches somewhere in it and the
/// exclude pattern does not. Both patterns search unanchored.
#[derive(Debug, Clone)]
pub struct RepoFilter {
    include: Regex,
    exclude: Regex,
}

impl RepoFilter {
    /// Compile both patterns. Fails on the first malformed one.
    pub fn new(include: &str, exclude: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile("include", include)?,
            exclude: compile("exclude", exclude)?,
        })
    }

    /// The filter that lets every name through.
    pub fn allow_all() -> Result<Self, ConfigError> {
        Self::new(DEFAULT_INCLUDE, DEFAULT_EXCLUDE)
    }

    pub fn allows(&self, name: &str) -> bool {
        self.include.is_match(name) && !self.exclude.is_match(name)
    }

    pub fn include_pattern(&self) -> &str {
        self.include.as_str()
    }

    pub fn exclude_pattern(&self) -> &str {
        self.exclude.as_str()
    }
}

fn compile(kind: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        kind,
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(".*", "^$", "anything", true)]
    #[case("^api-", "^$", "api-gateway", true)]
    #[case("^api-", "^$", "web-app", false)]
    #[case(".*", "legacy", "legacy-billing", false)]
    #[case("billing", "legacy", "legacy-billing", false)]
    #[case("service", "^$", "my-service-x", true)]
    fn allows_names(
        #[case] include: &str,
        #[case] exclude: &str,
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        let filter = RepoFilter::new(include, exclude).expect("compile");
        assert_eq!(filter.allows(name), expected, "{include} / {exclude} on {name}");
    }

    #[test]
    fn default_filter_keeps_patterns() {
        let filter = RepoFilter::allow_all().expect("compile");
        assert_eq!(filter.include_pattern(), DEFAULT_INCLUDE);
        assert_eq!(filter.exclude_pattern(), DEFAULT_EXCLUDE);
    }

    #[test]
    fn malformed_include_names_the_pattern() {
        let err = RepoFilter::new("(unclosed", "^$").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { kind: "include", .. }));
        assert!(err.to_string().contains("(unclosed"), "got: {err}");
    }

    #[test]
    fn malformed_exclude_is_reported_as_exclude() {
        let err = RepoFilter::new(".*", "[z-a]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { kind: "exclude", .. }));
    }
}
