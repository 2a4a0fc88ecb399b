//! Navigation routes - route table and history-mode pages
//!
//! Features:
//! - List the declared routes with their load mode
//! - Resolve a location to a route name, parameters and views
//! - Render any other path through the route table (history mode)
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{api_resolve, api_routes, ResolveQuery};
pub use page::page_view;
