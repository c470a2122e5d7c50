//! Glob-style URL pattern matching.
//!
//! Patterns are matched against `host + path` of a URL; scheme, query and
//! fragment are ignored. `*` matches any run of characters, everything else
//! is literal, and the comparison is case-insensitive.

use regex::{Regex, RegexBuilder};
use tracing::warn;
use url::Url;

/// A URL pattern compiled once and reused for every lookup.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    /// Compile a glob pattern into an anchored, case-insensitive regex.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = RegexBuilder::new(&format!("^{}$", body))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a URL against the pattern. Unparseable URLs never match.
    pub fn matches(&self, url: &str) -> bool {
        match host_and_path(url) {
            Some(target) => self.regex.is_match(&target),
            None => false,
        }
    }
}

/// Match `url` against a glob `pattern`.
///
/// Returns `false` for malformed URLs rather than failing.
pub fn match_pattern(url: &str, pattern: &str) -> bool {
    match CompiledPattern::new(pattern) {
        Ok(compiled) => compiled.matches(url),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Failed to compile URL pattern");
            false
        }
    }
}

/// `host + path` of a URL, or `None` if it does not parse.
fn host_and_path(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str().unwrap_or("");
    Some(format!("{}{}", host, parsed.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leetcode_problem_pages() {
        let pattern = "*leetcode.com/problems/*";
        assert!(match_pattern("https://leetcode.com/problems/two-sum", pattern));
        assert!(match_pattern("https://leetcode.com/problems/two-sum/description/?x=1#top", pattern));
        assert!(!match_pattern("https://leetcode.com/", pattern));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(match_pattern("https://GitHub.com/Owner/Repo/pull/12", "*github.com/*/*/pull/*"));
        assert!(match_pattern("https://github.com/owner/repo/PULL/12", "*github.com/*/*/pull/*"));
    }

    #[test]
    fn test_scheme_query_and_fragment_are_ignored() {
        assert!(match_pattern("http://www.youtube.com/watch?v=abc", "*youtube.com/watch*"));
        assert!(match_pattern("https://news.ycombinator.com/item?id=1#c", "*news.ycombinator.com/item*"));
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        assert!(match_pattern("https://example.com/a", "example.com/a"));
        assert!(!match_pattern("https://example.com/a/", "example.com/a"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(!match_pattern("https://examplexcom/", "example.com/"));
        assert!(match_pattern("https://example.com/a+b", "example.com/a+b"));
        assert!(!match_pattern("https://example.com/aab", "example.com/a+b"));
        assert!(match_pattern("https://example.com/(x)", "example.com/(x)"));
    }

    #[test]
    fn test_malformed_urls_do_not_match() {
        assert!(!match_pattern("not a url", "*"));
        assert!(!match_pattern("leetcode.com/problems/two-sum", "*leetcode.com/problems/*"));
        assert!(!match_pattern("", "*"));
    }

    #[test]
    fn test_anchored_at_both_ends() {
        assert!(!match_pattern("https://notleetcode.com/problems/x", "leetcode.com/problems/*"));
        assert!(match_pattern("https://notleetcode.com/problems/x", "*leetcode.com/problems/*"));
        assert!(!match_pattern("https://leetcode.com/problems/x", "*leetcode.com/problems"));
    }

    #[test]
    fn test_compiled_pattern_keeps_source() {
        let compiled = CompiledPattern::new("*x.com/*/status/*").unwrap();
        assert_eq!(compiled.as_str(), "*x.com/*/status/*");
        assert!(compiled.matches("https://x.com/someone/status/123"));
        assert!(!compiled.matches("https://x.com/someone"));
    }
}
