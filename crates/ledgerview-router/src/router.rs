//! Route resolution and navigation
//!
//! [`Router`] owns the table and the view cache and resolves locations
//! without side effects. [`Navigator`] is a navigation session on top of a
//! shared router: it tracks the active route and makes sure the most recent
//! navigation is the one that ends up active.

use crate::cache::ViewCache;
use crate::error::{DefaultErrorLogger, ErrorContext, ErrorLogger, RouterError, RouterResult};
use crate::pattern::{parse_query, split_location, strip_base};
use crate::table::{RouteMatch, RouteTable};
use crate::views::{View, ViewLoader};
use crate::Params;
use chrono::{DateTime, Utc};
use ledgerview_config::{NotFoundPolicy, RouterConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Route every not-found fallback resolves to
pub const HOME_ROUTE: &str = "home";

/// Outcome of a successful resolution
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    /// Route name
    pub name: String,
    /// Normalized path relative to the base
    pub path: String,
    /// Path including the base
    pub full_path: String,
    /// Decoded path parameters
    pub params: Params,
    /// Decoded query parameters
    pub query: BTreeMap<String, String>,
    /// Materialized view per slot
    pub views: BTreeMap<String, Arc<View>>,
    /// Whether any slot went through a deferred loader
    pub deferred: bool,
}

impl ResolvedRoute {
    /// View rendered into the given slot
    pub fn view(&self, slot: &str) -> Option<&Arc<View>> {
        self.views.get(slot)
    }

    /// Render a slot with this route's parameters
    pub fn render(&self, slot: &str) -> Option<String> {
        self.views.get(slot).map(|view| view.render(&self.params))
    }

    pub fn to_json(&self) -> serde_json::Value {
        let views: BTreeMap<&str, &str> = self
            .views
            .iter()
            .map(|(slot, view)| (slot.as_str(), view.name.as_str()))
            .collect();
        serde_json::json!({
            "name": self.name,
            "path": self.path,
            "full_path": self.full_path,
            "params": self.params,
            "query": self.query,
            "views": views,
            "deferred": self.deferred,
        })
    }
}

/// Resolver over an immutable route table
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    base: String,
    not_found: NotFoundPolicy,
    cache: ViewCache,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            base: "/".to_string(),
            not_found: NotFoundPolicy::Error,
            cache: ViewCache::new(),
        }
    }

    /// Router with base path and not-found policy from configuration
    pub fn with_config(table: RouteTable, config: &RouterConfig) -> Self {
        Self::new(table).with_base(&config.base).with_not_found(config.not_found)
    }

    pub fn with_base(mut self, base: &str) -> Self {
        let trimmed = base.trim_end_matches('/');
        self.base = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    pub fn with_not_found(mut self, policy: NotFoundPolicy) -> Self {
        self.not_found = policy;
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    fn join_base(&self, path: &str) -> String {
        if self.base == "/" {
            path.to_string()
        } else if path == "/" {
            format!("{}/", self.base)
        } else {
            format!("{}{}", self.base, path)
        }
    }

    fn match_location<'a>(&'a self, path: &str) -> RouterResult<RouteMatch<'a>> {
        match self.table.match_path(path) {
            Err(RouterError::RouteNotFound { path }) if self.not_found == NotFoundPolicy::Home => {
                log::info!("No route for {}, falling back to '{}'", path, HOME_ROUTE);
                let home = self.table.href(HOME_ROUTE, &Params::new())?;
                self.table.match_path(&home)
            }
            other => other,
        }
    }

    /// Resolve a location (path with optional query) to a route and its views
    pub async fn resolve(&self, location: &str) -> RouterResult<ResolvedRoute> {
        let relative = match strip_base(&self.base, location) {
            Some(relative) => relative,
            None if self.not_found == NotFoundPolicy::Home => {
                log::info!("{} is outside base {}, falling back to '{}'", location, self.base, HOME_ROUTE);
                "/"
            }
            None => {
                return Err(RouterError::RouteNotFound {
                    path: location.to_string(),
                })
            }
        };
        let (path, query) = split_location(relative);
        let matched = self.match_location(path)?;
        let entry = matched.entry;

        let mut views = BTreeMap::new();
        let mut deferred = false;
        for (slot, loader) in &entry.components {
            let view = match loader {
                ViewLoader::Eager(view) => view.clone(),
                ViewLoader::Deferred(factory) => {
                    deferred = true;
                    self.cache.get_or_load(&entry.name, slot, factory).await?
                }
            };
            views.insert(slot.clone(), view);
        }

        Ok(ResolvedRoute {
            name: entry.name.clone(),
            full_path: self.join_base(&matched.path),
            path: matched.path,
            params: matched.params,
            query: query.map(parse_query).unwrap_or_default(),
            views,
            deferred,
        })
    }

    /// Path (including base) for a named route
    pub fn href(&self, name: &str, params: &Params) -> RouterResult<String> {
        Ok(self.join_base(&self.table.href(name, params)?))
    }
}

/// The route currently shown by a navigation session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveRoute {
    pub path: String,
    pub full_path: String,
    pub name: String,
    pub params: Params,
    pub query: BTreeMap<String, String>,
    pub navigated_at: DateTime<Utc>,
}

impl From<&ResolvedRoute> for ActiveRoute {
    fn from(resolved: &ResolvedRoute) -> Self {
        Self {
            path: resolved.path.clone(),
            full_path: resolved.full_path.clone(),
            name: resolved.name.clone(),
            params: resolved.params.clone(),
            query: resolved.query.clone(),
            navigated_at: Utc::now(),
        }
    }
}

/// Navigation session with last-navigation-wins semantics
pub struct Navigator {
    router: Arc<Router>,
    generation: AtomicU64,
    active: RwLock<Option<ActiveRoute>>,
    logger: Box<dyn ErrorLogger>,
}

impl Navigator {
    pub fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            generation: AtomicU64::new(0),
            active: RwLock::new(None),
            logger: Box::new(DefaultErrorLogger),
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Ticket of the most recent navigation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Navigate to a location
    ///
    /// If another navigation starts before this one finishes loading, this
    /// one returns `NavigationCancelled` and leaves the active route alone.
    pub async fn push(&self, location: &str) -> RouterResult<ResolvedRoute> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let context = ErrorContext::new("navigate".to_string())
            .with_navigation(ticket)
            .with_data("location", serde_json::json!(location));

        let result = self.router.resolve(location).await;
        let cancelled = || RouterError::NavigationCancelled {
            path: location.to_string(),
        };

        let resolved = match result {
            Ok(resolved) => resolved,
            Err(error) => {
                if self.generation() != ticket {
                    self.logger.log_error(&cancelled(), &context);
                    return Err(cancelled());
                }
                self.logger.log_error(&error, &context);
                return Err(error);
            }
        };

        let mut active = self.active.write().await;
        if self.generation() != ticket {
            self.logger.log_error(&cancelled(), &context);
            return Err(cancelled());
        }
        *active = Some(ActiveRoute::from(&resolved));
        log::debug!("Navigation {} settled on '{}' {:?}", ticket, resolved.name, resolved.params);

        Ok(resolved)
    }

    /// Navigate to a named route
    pub async fn push_named(&self, name: &str, params: &Params) -> RouterResult<ResolvedRoute> {
        let location = self.router.href(name, params)?;
        self.push(&location).await
    }

    /// Snapshot of the active route
    pub async fn current(&self) -> Option<ActiveRoute> {
        self.active.read().await.clone()
    }
}
