//! URL pattern classification and matching.
//!
//! # Responsibilities
//! - Classify a raw url-pattern string into one of the five pattern kinds
//! - Reject malformed patterns at registration time
//! - Answer whether a single pattern accepts a request path
//!
//! # Design Decisions
//! - Path comparison is byte-for-byte and case-sensitive
//! - `*` is only legal as a `/*` suffix or a `*.` prefix
//! - No regex: every check is a prefix, suffix or equality test

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::routing::error::MappingError;

/// A classified url pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Matches one path verbatim.
    Exact(String),
    /// `base/*`: matches `base` itself and everything below it.
    Prefix(String),
    /// `*.ext`: matches by the extension of the last path segment.
    Extension(String),
    /// `/`: the catch-all.
    Default,
    /// `""`: the bare context root.
    ContextRoot,
}

/// Which rule family produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    ContextRoot,
    Prefix,
    Extension,
    Default,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::ContextRoot => "context_root",
            MatchKind::Prefix => "prefix",
            MatchKind::Extension => "extension",
            MatchKind::Default => "default",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Pattern {
    /// Classify a url-pattern as written in deployment configuration.
    pub fn parse(raw: &str) -> Result<Self, MappingError> {
        match raw {
            "" => return Ok(Pattern::ContextRoot),
            "/" => return Ok(Pattern::Default),
            _ => {}
        }

        if let Some(base) = raw.strip_suffix("/*") {
            if base.contains('*') {
                return Err(MappingError::invalid(raw, "prefix base must not contain '*'"));
            }
            if !base.is_empty() && !base.starts_with('/') {
                return Err(MappingError::invalid(raw, "prefix pattern must start with '/'"));
            }
            return Ok(Pattern::Prefix(base.to_string()));
        }

        if let Some(ext) = raw.strip_prefix("*.") {
            if ext.is_empty() {
                return Err(MappingError::invalid(raw, "extension must not be empty"));
            }
            if ext.contains(['/', '*']) {
                return Err(MappingError::invalid(raw, "extension must not contain '/' or '*'"));
            }
            if ext.contains('.') {
                return Err(MappingError::invalid(
                    raw,
                    "extension contains '.' and could never match the text after a path's last dot",
                ));
            }
            return Ok(Pattern::Extension(ext.to_string()));
        }

        if raw.contains('*') {
            return Err(MappingError::invalid(
                raw,
                "'*' is only allowed as a \"/*\" suffix or a \"*.\" prefix",
            ));
        }
        if !raw.starts_with('/') {
            return Err(MappingError::invalid(raw, "exact pattern must start with '/'"));
        }
        Ok(Pattern::Exact(raw.to_string()))
    }

    pub fn kind(&self) -> MatchKind {
        match self {
            Pattern::Exact(_) => MatchKind::Exact,
            Pattern::Prefix(_) => MatchKind::Prefix,
            Pattern::Extension(_) => MatchKind::Extension,
            Pattern::Default => MatchKind::Default,
            Pattern::ContextRoot => MatchKind::ContextRoot,
        }
    }

    /// Returns true if this pattern, taken on its own, accepts `path`.
    ///
    /// Precedence between patterns is decided by the mapping table, not here.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Pattern::Exact(exact) => path == exact,
            Pattern::Prefix(base) => prefix_matches(base, path),
            Pattern::Extension(ext) => extension_of(path) == Some(ext.as_str()),
            Pattern::Default => true,
            Pattern::ContextRoot => is_context_root(path),
        }
    }
}

impl FromStr for Pattern {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::parse(s)
    }
}

/// Writes the literal url-pattern back out.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Exact(path) => f.write_str(path),
            Pattern::Prefix(base) => write!(f, "{}/*", base),
            Pattern::Extension(ext) => write!(f, "*.{}", ext),
            Pattern::Default => f.write_str("/"),
            Pattern::ContextRoot => Ok(()),
        }
    }
}

/// `path == base` or `path` continues below `base` at a segment boundary.
/// A trailing slash on `path` therefore still matches.
pub(crate) fn prefix_matches(base: &str, path: &str) -> bool {
    match path.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Extension of the final path segment, if it has one.
pub(crate) fn extension_of(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment.rfind('.').map(|dot| &segment[dot + 1..])
}

/// Remaining path after the context path was stripped: `/ctx` gives `""`,
/// `/ctx/` gives `"/"`.
pub(crate) fn is_context_root(path: &str) -> bool {
    path.is_empty() || path == "/"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(Pattern::parse("").unwrap(), Pattern::ContextRoot);
        assert_eq!(Pattern::parse("/").unwrap(), Pattern::Default);
        assert_eq!(Pattern::parse("/aa").unwrap(), Pattern::Exact("/aa".into()));
        assert_eq!(Pattern::parse("/a/b/*").unwrap(), Pattern::Prefix("/a/b".into()));
        assert_eq!(Pattern::parse("/*").unwrap(), Pattern::Prefix(String::new()));
        assert_eq!(Pattern::parse("*.jsp").unwrap(), Pattern::Extension("jsp".into()));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["/a*", "/a/*/b", "/*/*", "*/", "*.", "*.tar.gz", "*.a/b", "aa", "a/*", "**.jsp"] {
            let err = Pattern::parse(raw).unwrap_err();
            assert!(
                matches!(err, MappingError::InvalidPattern { ref pattern, .. } if pattern == raw),
                "expected {:?} to be rejected, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_multi_dot_extension_reports_unreachable() {
        let Err(MappingError::InvalidPattern { reason, .. }) = Pattern::parse("*.tar.gz") else {
            panic!("expected *.tar.gz to be rejected");
        };
        assert!(reason.contains("could never match"), "{}", reason);

        let Err(MappingError::InvalidPattern { reason, .. }) = Pattern::parse("*.a/b") else {
            panic!("expected *.a/b to be rejected");
        };
        assert!(!reason.contains("could never match"), "{}", reason);
    }

    #[test]
    fn test_display_round_trips_literal() {
        for raw in ["", "/", "/aa", "/a/*", "/*", "*.html"] {
            assert_eq!(raw.parse::<Pattern>().unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_prefix_matching() {
        let pattern = Pattern::parse("/a/b/*").unwrap();
        assert!(pattern.matches("/a/b"));
        assert!(pattern.matches("/a/b/"));
        assert!(pattern.matches("/a/b/c/d"));
        assert!(!pattern.matches("/a/bc"));
        assert!(!pattern.matches("/a"));

        let everything = Pattern::parse("/*").unwrap();
        assert!(everything.matches("/x"));
        assert!(everything.matches(""));
    }

    #[test]
    fn test_extension_matching() {
        let pattern = Pattern::parse("*.jsp").unwrap();
        assert!(pattern.matches("/index.jsp"));
        assert!(pattern.matches("/a/b.c/page.jsp"));
        assert!(!pattern.matches("/a.jsp/page"));
        assert!(!pattern.matches("/index.jspx"));
        assert!(!pattern.matches("/index.jsp/"));
    }

    #[test]
    fn test_exact_is_byte_for_byte() {
        let pattern = Pattern::parse("/aa").unwrap();
        assert!(pattern.matches("/aa"));
        assert!(!pattern.matches("/aa/"));
        assert!(!pattern.matches("/AA"));
    }

    #[test]
    fn test_context_root_forms() {
        assert!(Pattern::ContextRoot.matches(""));
        assert!(Pattern::ContextRoot.matches("/"));
        assert!(!Pattern::ContextRoot.matches("/a"));
    }
}
