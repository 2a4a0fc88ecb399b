//! History-mode route table and resolver for the ledger UI
//!
//! Routes map path patterns to views. Eager views are ready at declaration
//! time; deferred views are produced by a [`ViewFactory`] on first visit and
//! cached with a single-flight guard per route.

pub mod app;
pub mod cache;
pub mod error;
pub mod pattern;
pub mod router;
pub mod table;
pub mod views;

use std::collections::BTreeMap;

pub use app::{build_router, ledger_routes, ACCOUNT_REGISTER_ROUTE, LEDGER_ROUTE};
pub use cache::ViewCache;
pub use error::{ErrorCode, ErrorDetails, ErrorSeverity, RouterError, RouterResult};
pub use pattern::{normalize_path, PathPattern, Segment};
pub use router::{ActiveRoute, Navigator, ResolvedRoute, Router, HOME_ROUTE};
pub use table::{RouteEntry, RouteMatch, RouteSummary, RouteTable, DEFAULT_SLOT};
pub use views::{View, ViewFactory, ViewLoader};

/// Path parameter bindings, keyed by parameter name
pub type Params = BTreeMap<String, String>;
