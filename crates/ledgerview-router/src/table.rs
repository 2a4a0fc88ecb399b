//! Static route table
//!
//! Entries are validated once at construction: names must be unique and no
//! two patterns may share a shape. Matching tries literal patterns first,
//! then parameterized patterns ordered by specificity.

use crate::error::{RouterError, RouterResult};
use crate::pattern::{normalize_path, path_segments, PathPattern};
use crate::views::{View, ViewLoader};
use crate::Params;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Name of the slot every entry renders into by default
pub const DEFAULT_SLOT: &str = "default";

/// One route: a pattern, a name and the views for its slots
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: PathPattern,
    pub name: String,
    pub components: BTreeMap<String, ViewLoader>,
}

impl RouteEntry {
    /// Entry with a single `default` slot
    pub fn new(pattern: &str, name: &str, loader: ViewLoader) -> RouterResult<Self> {
        let mut components = BTreeMap::new();
        components.insert(DEFAULT_SLOT.to_string(), loader);
        Self::with_components(pattern, name, components)
    }

    /// Entry with explicit named slots
    pub fn with_components(
        pattern: &str,
        name: &str,
        components: BTreeMap<String, ViewLoader>,
    ) -> RouterResult<Self> {
        if components.is_empty() {
            return Err(RouterError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!("route '{}' declares no views", name),
            });
        }
        Ok(Self {
            pattern: PathPattern::parse(pattern)?,
            name: name.to_string(),
            components,
        })
    }

    /// Shortcut for an eager single-slot entry
    pub fn eager(pattern: &str, name: &str, view: View) -> RouterResult<Self> {
        Self::new(pattern, name, ViewLoader::eager(view))
    }

    /// Load mode of the default slot, or `deferred` if any slot is deferred
    pub fn load_mode(&self) -> &'static str {
        if self.components.values().any(ViewLoader::is_deferred) {
            "deferred"
        } else {
            "eager"
        }
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            name: self.name.clone(),
            path: self.pattern.to_string(),
            load: self.load_mode(),
            slots: self.components.keys().cloned().collect(),
        }
    }
}

/// Serializable description of a route, for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub name: String,
    pub path: String,
    pub load: &'static str,
    pub slots: Vec<String>,
}

/// A matched route with its decoded parameters
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub path: String,
    pub params: Params,
}

/// Immutable, validated route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    by_name: HashMap<String, usize>,
    literal: HashMap<String, usize>,
    /// Parameterized entries, most specific first
    dynamic: Vec<usize>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> RouterResult<Self> {
        let mut by_name = HashMap::new();
        let mut shapes = HashMap::new();
        let mut literal = HashMap::new();
        let mut dynamic = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            if by_name.insert(entry.name.clone(), index).is_some() {
                return Err(RouterError::DuplicateRoute {
                    key: format!("name '{}'", entry.name),
                });
            }
            if let Some(other) = shapes.insert(entry.pattern.shape(), index) {
                return Err(RouterError::DuplicateRoute {
                    key: format!(
                        "pattern '{}' collides with '{}'",
                        entry.pattern,
                        entries[other].pattern
                    ),
                });
            }
            if entry.pattern.is_literal() {
                literal.insert(entry.pattern.to_string(), index);
            } else {
                dynamic.push(index);
            }
        }

        dynamic.sort_by(|a, b| entries[*b].pattern.rank().cmp(&entries[*a].pattern.rank()));

        Ok(Self {
            entries,
            by_name,
            literal,
            dynamic,
        })
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&RouteEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match a path (normalized here) against the table
    pub fn match_path(&self, path: &str) -> RouterResult<RouteMatch<'_>> {
        let path = normalize_path(path);

        if let Some(&index) = self.literal.get(&path) {
            log::debug!("Literal match {} -> {}", path, self.entries[index].name);
            return Ok(RouteMatch {
                entry: &self.entries[index],
                path,
                params: Params::new(),
            });
        }

        let parts = path_segments(&path);
        for &index in &self.dynamic {
            let entry = &self.entries[index];
            if let Some(params) = entry.pattern.matches(&parts)? {
                log::debug!("Pattern match {} -> {} {:?}", path, entry.name, params);
                return Ok(RouteMatch { entry, path, params });
            }
        }

        Err(RouterError::RouteNotFound { path })
    }

    /// Build the path for a named route
    pub fn href(&self, name: &str, params: &Params) -> RouterResult<String> {
        let entry = self.get(name).ok_or_else(|| RouterError::RouteNotFound {
            path: format!("<named route '{}'>", name),
        })?;
        entry.pattern.build(params)
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.entries.iter().map(RouteEntry::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{home_view, ledger_view};

    fn table(patterns: &[(&str, &str)]) -> RouterResult<RouteTable> {
        let entries = patterns
            .iter()
            .map(|(pattern, name)| RouteEntry::eager(pattern, name, home_view()))
            .collect::<RouterResult<Vec<_>>>()?;
        RouteTable::new(entries)
    }

    #[test]
    fn test_literal_wins_over_param() {
        let table = table(&[("/ledger/:ledger_id", "ledger"), ("/ledger/new", "ledger-new")]).unwrap();

        let m = table.match_path("/ledger/new").unwrap();
        assert_eq!(m.entry.name, "ledger-new");
        assert!(m.params.is_empty());

        let m = table.match_path("/ledger/42").unwrap();
        assert_eq!(m.entry.name, "ledger");
        assert_eq!(m.params.get("ledger_id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_leftmost_literal_ranks_first() {
        let table = table(&[("/:kind/accounts", "by-kind"), ("/ledger/:section", "ledger-section")]).unwrap();
        let m = table.match_path("/ledger/accounts").unwrap();
        assert_eq!(m.entry.name, "ledger-section");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = table(&[("/a", "same"), ("/b", "same")]).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_colliding_shapes_rejected() {
        let err = table(&[("/ledger/:ledger_id", "a"), ("/ledger/:id", "b")]).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute { ref key } if key.contains("collides")));
    }

    #[test]
    fn test_no_match() {
        let table = table(&[("/", "home")]).unwrap();
        let err = table.match_path("/unknown").unwrap_err();
        assert_eq!(err, RouterError::RouteNotFound { path: "/unknown".to_string() });
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let table = table(&[("/ledger/:ledger_id", "ledger")]).unwrap();
        let m = table.match_path("/ledger/42/").unwrap();
        assert_eq!(m.path, "/ledger/42");
        assert_eq!(m.entry.name, "ledger");
    }

    #[test]
    fn test_empty_components_rejected() {
        let err = RouteEntry::with_components("/", "home", BTreeMap::new()).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn test_href_and_summaries() {
        let entries = vec![
            RouteEntry::eager("/", "home", home_view()).unwrap(),
            RouteEntry::eager("/ledger/:ledger_id", "ledger", ledger_view()).unwrap(),
        ];
        let table = RouteTable::new(entries).unwrap();

        let params: Params = [("ledger_id".to_string(), "5".to_string())].into_iter().collect();
        assert_eq!(table.href("ledger", &params).unwrap(), "/ledger/5");
        assert!(matches!(
            table.href("missing", &params),
            Err(RouterError::RouteNotFound { .. })
        ));

        let summaries = table.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].path, "/ledger/:ledger_id");
        assert_eq!(summaries[1].load, "eager");
        assert_eq!(summaries[1].slots, vec!["default".to_string()]);
    }
}
