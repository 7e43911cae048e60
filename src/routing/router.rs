//! Mapping table construction and lookup.
//!
//! # Responsibilities
//! - Collect (pattern, handler) registrations at deployment time
//! - Reject malformed and duplicate patterns before the table exists
//! - Resolve a request path to exactly one entry, or an explicit NoMatch
//!
//! # Design Decisions
//! - Immutable after `build()` (thread-safe without locks)
//! - Entries live in one arena; lookup structures hold indices into it
//! - O(1) exact and extension lookup via HashMap
//! - O(n) prefix scan, longest base first, stops at the first hit
//! - Explicit NoMatch rather than a silent default

use std::collections::HashMap;

use crate::routing::error::MappingError;
use crate::routing::matcher::{extension_of, MatchKind, Pattern};

/// One registered (pattern, handler) pair.
#[derive(Debug, Clone)]
pub struct MappingEntry<H> {
    pub pattern: Pattern,
    pub handler: H,
}

/// The winning entry for a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch<'a, H> {
    pub handler: &'a H,
    pub pattern: &'a Pattern,
    pub kind: MatchKind,
    /// Part of the request path consumed by the mapping.
    pub servlet_path: &'a str,
    /// Remainder below a prefix mapping, or `/` for the context root.
    pub path_info: Option<&'a str>,
}

/// Outcome of a lookup. `NoMatch` is a normal result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a, H> {
    Matched(PathMatch<'a, H>),
    NoMatch,
}

impl<'a, H> Resolution<'a, H> {
    pub fn handler(&self) -> Option<&'a H> {
        match self {
            Resolution::Matched(m) => Some(m.handler),
            Resolution::NoMatch => None,
        }
    }
}

/// Collects registrations and freezes them into a [`MappingTable`].
#[derive(Debug)]
pub struct MappingTableBuilder<H> {
    table: MappingTable<H>,
}

impl<H> MappingTableBuilder<H> {
    pub fn new() -> Self {
        Self {
            table: MappingTable {
                entries: Vec::new(),
                exact: HashMap::new(),
                prefixes: Vec::new(),
                extensions: HashMap::new(),
                default: None,
                context_root: None,
            },
        }
    }

    /// Classify `raw` and add it to the table under `handler`.
    pub fn register(&mut self, raw: &str, handler: H) -> Result<&mut Self, MappingError> {
        let pattern = Pattern::parse(raw)?;
        let table = &mut self.table;
        let index = table.entries.len();

        let taken = match &pattern {
            Pattern::Exact(path) => table.exact.contains_key(path),
            Pattern::Prefix(base) => table
                .prefixes
                .iter()
                .any(|&i| matches!(&table.entries[i].pattern, Pattern::Prefix(b) if b == base)),
            Pattern::Extension(ext) => table.extensions.contains_key(ext),
            Pattern::Default => table.default.is_some(),
            Pattern::ContextRoot => table.context_root.is_some(),
        };
        if taken {
            return Err(MappingError::DuplicatePattern {
                pattern: raw.to_string(),
            });
        }

        match &pattern {
            Pattern::Exact(path) => {
                table.exact.insert(path.clone(), index);
            }
            Pattern::Prefix(_) => table.prefixes.push(index),
            Pattern::Extension(ext) => {
                table.extensions.insert(ext.clone(), index);
            }
            Pattern::Default => table.default = Some(index),
            Pattern::ContextRoot => table.context_root = Some(index),
        }
        table.entries.push(MappingEntry { pattern, handler });
        Ok(self)
    }

    /// Freeze the table. Prefixes are ordered longest base first.
    pub fn build(self) -> MappingTable<H> {
        let mut table = self.table;
        let entries = &table.entries;
        table
            .prefixes
            .sort_by_key(|&i| std::cmp::Reverse(prefix_base(&entries[i].pattern).len()));
        table
    }
}

impl<H> Default for MappingTableBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Frozen url-pattern table for one deployment.
#[derive(Debug)]
pub struct MappingTable<H> {
    entries: Vec<MappingEntry<H>>,
    exact: HashMap<String, usize>,
    /// Indices of prefix entries, longest base first.
    prefixes: Vec<usize>,
    extensions: HashMap<String, usize>,
    default: Option<usize>,
    context_root: Option<usize>,
}

impl<H> MappingTable<H> {
    pub fn builder() -> MappingTableBuilder<H> {
        MappingTableBuilder::new()
    }

    /// A table with no entries; every lookup is NoMatch.
    pub fn empty() -> Self {
        MappingTableBuilder::new().build()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry<H>> {
        self.entries.iter()
    }

    /// Select the single entry that handles `path`.
    ///
    /// Families are tried in a fixed order and the first one that matches
    /// wins: exact, context root, longest prefix, extension, default.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Result<Resolution<'a, H>, MappingError> {
        if let Some(&i) = self.exact.get(path) {
            return Ok(self.matched(i, path, None));
        }

        if let Some(i) = self.context_root.filter(|&i| self.entries[i].pattern.matches(path)) {
            return Ok(self.matched(i, "", Some("/")));
        }

        if let Some(i) = self.longest_prefix(path)? {
            let base_len = prefix_base(&self.entries[i].pattern).len();
            let (servlet_path, rest) = path.split_at(base_len);
            let path_info = (!rest.is_empty()).then_some(rest);
            return Ok(self.matched(i, servlet_path, path_info));
        }

        if let Some(&i) = extension_of(path).and_then(|ext| self.extensions.get(ext)) {
            return Ok(self.matched(i, path, None));
        }

        if let Some(i) = self.default {
            return Ok(self.matched(i, path, None));
        }

        tracing::trace!(path = %path, "No url pattern matched");
        Ok(Resolution::NoMatch)
    }

    fn longest_prefix(&self, path: &str) -> Result<Option<usize>, MappingError> {
        let mut candidates = self
            .prefixes
            .iter()
            .copied()
            .filter(|&i| self.entries[i].pattern.matches(path));

        let Some(winner) = candidates.next() else {
            return Ok(None);
        };
        let winner_len = prefix_base(&self.entries[winner].pattern).len();

        // Sorted longest first, so only the next candidate can tie.
        if let Some(other) = candidates.next() {
            if prefix_base(&self.entries[other].pattern).len() == winner_len {
                return Err(MappingError::InternalConsistency(format!(
                    "prefix patterns {:?} and {:?} both match {:?} with equal length",
                    self.entries[winner].pattern.to_string(),
                    self.entries[other].pattern.to_string(),
                    path
                )));
            }
        }
        Ok(Some(winner))
    }

    fn matched<'a>(
        &'a self,
        index: usize,
        servlet_path: &'a str,
        path_info: Option<&'a str>,
    ) -> Resolution<'a, H> {
        let entry = &self.entries[index];
        tracing::trace!(
            pattern = %entry.pattern,
            kind = %entry.pattern.kind(),
            servlet_path = %servlet_path,
            "Url pattern matched"
        );
        Resolution::Matched(PathMatch {
            handler: &entry.handler,
            pattern: &entry.pattern,
            kind: entry.pattern.kind(),
            servlet_path,
            path_info,
        })
    }
}

fn prefix_base(pattern: &Pattern) -> &str {
    match pattern {
        Pattern::Prefix(base) => base,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_table() -> MappingTable<&'static str> {
        let mut builder = MappingTable::builder();
        builder
            .register("/a/*", "Ha")
            .unwrap()
            .register("/aa", "Haa")
            .unwrap()
            .register("/aa/*", "Haaa")
            .unwrap()
            .register("/a/b/*", "Hab")
            .unwrap()
            .register("/", "Hdef")
            .unwrap()
            .register("", "Hroot")
            .unwrap();
        builder.build()
    }

    fn handler_for<'a>(table: &'a MappingTable<&'static str>, path: &'a str) -> Option<&'static str> {
        table.resolve(path).unwrap().handler().copied()
    }

    #[test]
    fn test_scenario() {
        let table = scenario_table();
        assert_eq!(handler_for(&table, "/aa"), Some("Haa"));
        assert_eq!(handler_for(&table, "/a/c"), Some("Ha"));
        assert_eq!(handler_for(&table, "/aa/b"), Some("Haaa"));
        assert_eq!(handler_for(&table, "/a/b/c/d"), Some("Hab"));
        assert_eq!(handler_for(&table, "/a/b"), Some("Hab"));
        assert_eq!(handler_for(&table, "/defaultStuff"), Some("Hdef"));
        assert_eq!(handler_for(&table, ""), Some("Hroot"));
        assert_eq!(handler_for(&table, "/"), Some("Hroot"));
    }

    #[test]
    fn test_trailing_slash_defeats_exact_but_not_prefix() {
        let table = scenario_table();
        // "/aa/" is not "/aa", but sits under "/aa/*".
        assert_eq!(handler_for(&table, "/aa/"), Some("Haaa"));
        assert_eq!(handler_for(&table, "/a/b/"), Some("Hab"));

        let mut builder = MappingTable::builder();
        builder.register("/exact", 1).unwrap().register("/", 2).unwrap();
        let table = builder.build();
        assert_eq!(table.resolve("/exact/").unwrap().handler(), Some(&2));
    }

    #[test]
    fn test_extension_beats_default_but_not_prefix() {
        let mut builder = MappingTable::builder();
        builder
            .register("*.jsp", "jsp")
            .unwrap()
            .register("/", "default")
            .unwrap()
            .register("/static/*", "static")
            .unwrap();
        let table = builder.build();

        assert_eq!(table.resolve("/index.jsp").unwrap().handler(), Some(&"jsp"));
        assert_eq!(table.resolve("/static/page.jsp").unwrap().handler(), Some(&"static"));
        assert_eq!(table.resolve("/index.html").unwrap().handler(), Some(&"default"));
    }

    #[test]
    fn test_context_root_not_default() {
        let mut builder = MappingTable::builder();
        builder.register("/", "default").unwrap().register("", "root").unwrap();
        let table = builder.build();
        assert_eq!(table.resolve("").unwrap().handler(), Some(&"root"));

        let mut builder = MappingTable::builder();
        builder.register("/", "default").unwrap();
        let table = builder.build();
        assert_eq!(table.resolve("").unwrap().handler(), Some(&"default"));
    }

    #[test]
    fn test_no_match_without_default() {
        let mut builder = MappingTable::builder();
        builder.register("/a/*", "a").unwrap();
        let table = builder.build();
        assert_eq!(table.resolve("/b").unwrap(), Resolution::NoMatch);
        assert!(MappingTable::<u8>::empty().resolve("/").unwrap().handler().is_none());
    }

    #[test]
    fn test_match_details() {
        let table = scenario_table();

        let Resolution::Matched(m) = table.resolve("/a/b/c/d").unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(m.kind, MatchKind::Prefix);
        assert_eq!(m.pattern.to_string(), "/a/b/*");
        assert_eq!(m.servlet_path, "/a/b");
        assert_eq!(m.path_info, Some("/c/d"));

        let Resolution::Matched(m) = table.resolve("/a/b").unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(m.path_info, None);

        let Resolution::Matched(m) = table.resolve("").unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(m.kind, MatchKind::ContextRoot);
        assert_eq!(m.servlet_path, "");
        assert_eq!(m.path_info, Some("/"));

        let Resolution::Matched(m) = table.resolve("/defaultStuff").unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(m.kind, MatchKind::Default);
        assert_eq!(m.servlet_path, "/defaultStuff");
    }

    #[test]
    fn test_distinct_exact_patterns_resolve_to_own_handlers() {
        let mut builder = MappingTable::builder();
        builder
            .register("/x", "x")
            .unwrap()
            .register("/x/", "x-slash")
            .unwrap()
            .register("/y", "y")
            .unwrap()
            .register("/a/b", "ab")
            .unwrap()
            .register("/", "default")
            .unwrap();
        let table = builder.build();

        for (path, expected) in [("/x", "x"), ("/x/", "x-slash"), ("/y", "y"), ("/a/b", "ab")] {
            let Resolution::Matched(m) = table.resolve(path).unwrap() else {
                panic!("expected a match for {}", path);
            };
            assert_eq!(*m.handler, expected, "{}", path);
            assert_eq!(m.kind, MatchKind::Exact);
            assert_eq!(m.servlet_path, path);
        }
        assert_eq!(table.resolve("/x/z").unwrap().handler(), Some(&"default"));
        assert_eq!(table.resolve("/a").unwrap().handler(), Some(&"default"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut builder = MappingTable::builder();
        builder.register("/a/*", 1).unwrap();
        for raw in ["/a/*", "/", "", "*.do", "/x"] {
            if raw != "/a/*" {
                builder.register(raw, 2).unwrap();
            }
            let err = builder.register(raw, 3).unwrap_err();
            assert_eq!(
                err,
                MappingError::DuplicatePattern {
                    pattern: raw.to_string()
                }
            );
        }
        assert_eq!(builder.build().len(), 5);
    }

    #[test]
    fn test_one_handler_many_patterns() {
        let mut builder = MappingTable::builder();
        builder.register("/a/*", "shared").unwrap().register("*.do", "shared").unwrap();
        let table = builder.build();
        assert_eq!(table.resolve("/a/x").unwrap().handler(), Some(&"shared"));
        assert_eq!(table.resolve("/b/x.do").unwrap().handler(), Some(&"shared"));
    }

    #[test]
    fn test_longest_prefix_independent_of_registration_order() {
        let bases = ["/a", "/a/b", "/a/b/c"];
        for rotation in 0..bases.len() {
            let mut builder = MappingTable::builder();
            for i in 0..bases.len() {
                let base = bases[(i + rotation) % bases.len()];
                builder.register(&format!("{}/*", base), base).unwrap();
            }
            let table = builder.build();
            assert_eq!(table.resolve("/a/b/c/d").unwrap().handler(), Some(&"/a/b/c"));
            assert_eq!(table.resolve("/a/b/x").unwrap().handler(), Some(&"/a/b"));
            assert_eq!(table.resolve("/a/x").unwrap().handler(), Some(&"/a"));
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let table = scenario_table();
        for path in ["/aa", "/a/c", "", "/zzz", "/a/b/"] {
            let first = table.resolve(path).unwrap();
            for _ in 0..3 {
                assert_eq!(table.resolve(path).unwrap(), first);
            }
        }
    }

    #[test]
    fn test_equal_length_prefix_tie_is_reported() {
        let mut builder = MappingTable::builder();
        builder.register("/a/*", "first").unwrap();
        let mut table = builder.build();

        // Registration never allows this; forge the state directly.
        table.entries.push(MappingEntry {
            pattern: Pattern::Prefix("/a".into()),
            handler: "second",
        });
        table.prefixes.push(1);

        let err = table.resolve("/a/x").unwrap_err();
        assert!(matches!(err, MappingError::InternalConsistency(_)));
    }

    #[test]
    fn test_concurrent_readers() {
        let table = std::sync::Arc::new(scenario_table());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = table.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        assert_eq!(table.resolve("/aa/b").unwrap().handler(), Some(&"Haaa"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
