//! The ledger UI route table
//!
//! | Path                                               | Name               | Load     |
//! |----------------------------------------------------|--------------------|----------|
//! | `/`                                                | `home`             | eager    |
//! | `/ledger/:ledger_id`                               | `ledger`           | deferred |
//! | `/ledger/:ledger_id/accounts/:account_id/register` | `account-register` | deferred |

use crate::error::RouterResult;
use crate::router::{Router, HOME_ROUTE};
use crate::table::{RouteEntry, RouteTable};
use crate::views::{self, BuiltinViewFactory, FileViewFactory, View, ViewLoader};
use ledgerview_config::RouterConfig;
use std::path::Path;

pub const LEDGER_ROUTE: &str = "ledger";
pub const ACCOUNT_REGISTER_ROUTE: &str = "account-register";

fn deferred(views_dir: Option<&Path>, build: fn() -> View) -> ViewLoader {
    match views_dir {
        Some(dir) => {
            let view = build();
            ViewLoader::deferred(FileViewFactory::new(dir, &view.name, &view.title))
        }
        None => ViewLoader::deferred(BuiltinViewFactory::new(build)),
    }
}

/// Route entries for the ledger UI
///
/// Deferred views are read from `views_dir` when given, otherwise the
/// built-in templates are used.
pub fn ledger_routes(views_dir: Option<&Path>) -> RouterResult<Vec<RouteEntry>> {
    Ok(vec![
        RouteEntry::eager("/", HOME_ROUTE, views::home_view())?,
        RouteEntry::new(
            "/ledger/:ledger_id",
            LEDGER_ROUTE,
            deferred(views_dir, views::ledger_view),
        )?,
        RouteEntry::new(
            "/ledger/:ledger_id/accounts/:account_id/register",
            ACCOUNT_REGISTER_ROUTE,
            deferred(views_dir, views::account_view),
        )?,
    ])
}

/// Build the application router from configuration
pub fn build_router(config: &RouterConfig) -> RouterResult<Router> {
    let table = RouteTable::new(ledger_routes(config.views_dir.as_deref())?)?;
    log::info!(
        "Route table ready: {} routes, base {}",
        table.len(),
        config.base
    );
    Ok(Router::with_config(table, config))
}
