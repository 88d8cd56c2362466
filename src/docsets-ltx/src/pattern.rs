//! Glob matching of site-relative page paths.

use globset::{GlobBuilder, GlobMatcher};

use crate::errors::Result;

/// A single compiled glob, optionally negated with a leading `!`.
#[derive(Debug, Clone)]
struct PathPattern {
    matcher: GlobMatcher,
    negated: bool,
}

impl PathPattern {
    fn new(pattern: &str) -> Result<Self> {
        let (negated, glob) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };

        // `*` stays inside one path segment, `**` crosses segments.
        let matcher = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()?
            .compile_matcher();

        Ok(Self { matcher, negated })
    }

    fn is_match(&self, path: &str) -> bool {
        let hit = candidates(path).any(|candidate| self.matcher.is_match(candidate));
        hit != self.negated
    }
}

/// Page paths are directory-style (`/blog/post/`), so the trailing slash is optional when matching.
fn candidates(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = if path.len() > 1 && path.ends_with('/') {
        Some(path.trim_end_matches('/'))
    } else {
        None
    };
    std::iter::once(path).chain(trimmed)
}

/// An ordered list of compiled glob patterns.
///
/// The order matters for promote/demote lists: the first pattern that matches wins.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<PathPattern>,
    sources: Vec<String>,
}

impl PatternList {
    /// Compiles every pattern in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is invalid.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        let mut sources = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            compiled.push(PathPattern::new(pattern.as_ref())?);
            sources.push(pattern.as_ref().to_string());
        }
        Ok(Self {
            patterns: compiled,
            sources,
        })
    }

    /// True if the path matches at least one pattern. An empty list matches nothing.
    pub fn is_match(&self, path: &str) -> bool {
        self.position(path).is_some()
    }

    /// Index of the first pattern that matches the path.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.patterns.iter().position(|pattern| pattern.is_match(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The patterns as they were written in the configuration.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

/// Determines if a page path matches any of the glob patterns.
///
/// # Errors
///
/// Returns an error if any glob pattern is invalid.
///
/// # Examples
///
/// ```
/// # use docsets_ltx::matches;
/// assert!(matches("/blog/hello/", &["/blog/*"]).unwrap());
/// assert!(!matches("/about/", &["/blog/**"]).unwrap());
/// assert!(!matches("/about/", &[] as &[&str]).unwrap());
/// ```
pub fn matches<S: AsRef<str>>(path: &str, patterns: &[S]) -> Result<bool> {
    Ok(PatternList::new(patterns)?.is_match(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_star_matches_everything() {
        let all = PatternList::new(&["**"]).unwrap();
        for path in ["/", "/a/", "/a/b/c/", "/de/herz/"] {
            assert!(all.is_match(path), "{path} should match **");
        }
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        let blog = PatternList::new(&["/blog/*"]).unwrap();
        assert!(blog.is_match("/blog/post/"));
        assert!(blog.is_match("/blog/post"));
        assert!(!blog.is_match("/blog/2024/post/"));
        assert!(!blog.is_match("/news/post/"));

        let deep = PatternList::new(&["/blog/**"]).unwrap();
        assert!(deep.is_match("/blog/2024/post/"));
    }

    #[test]
    fn test_root_pattern_is_exact() {
        let root = PatternList::new(&["/"]).unwrap();
        assert!(root.is_match("/"));
        assert!(!root.is_match("/a/"));
    }

    #[test]
    fn test_negated_pattern() {
        let not_legal = PatternList::new(&["!/legal/**"]).unwrap();
        assert!(not_legal.is_match("/about/"));
        assert!(!not_legal.is_match("/legal/imprint/"));
    }

    #[test]
    fn test_character_classes_and_alternation() {
        let list = PatternList::new(&["/v[12]/*", "/{faq,help}/"]).unwrap();
        assert!(list.is_match("/v1/intro/"));
        assert!(!list.is_match("/v3/intro/"));
        assert!(list.is_match("/faq/"));
        assert!(list.is_match("/help/"));
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let empty = PatternList::new::<&str>(&[]).unwrap();
        assert!(empty.is_empty());
        assert!(!empty.is_match("/"));
        assert_eq!(empty.position("/"), None);
    }

    #[test]
    fn test_position_is_first_match() {
        let list = PatternList::new(&["/a/**", "**", "/a/b/"]).unwrap();
        assert_eq!(list.position("/a/b/"), Some(0));
        assert_eq!(list.position("/c/"), Some(1));
        assert_eq!(list.len(), 3);
        assert_eq!(list.sources()[2], "/a/b/");
    }

    #[test]
    fn test_inclusion_is_exactly_any_match() {
        let patterns = ["/docs/**", "/faq/"];
        for (path, expected) in [("/docs/intro/", true), ("/faq/", true), ("/blog/", false), ("/", false)] {
            assert_eq!(matches(path, &patterns).unwrap(), expected, "{path}");
        }
    }

    #[test]
    fn test_invalid_glob() {
        assert!(PatternList::new(&["/docs/[a-"]).is_err());
        assert!(matches("/", &["{unclosed"]).is_err());
    }
}
