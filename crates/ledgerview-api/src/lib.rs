//! HTTP service for the ledger UI
//!
//! Routes are organized into modules:
//! - routes::home: service identity and health
//! - routes::navigation: route table, resolution, history-mode pages
//! - routes::style: utility-CSS configuration

pub mod error;
pub mod routes;

use axum::routing::get;
use ledgerview_config::Config;
use ledgerview_style::StyleConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ledgerview_router::Router>,
    pub style: Arc<StyleConfig>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, router: ledgerview_router::Router, style: StyleConfig) -> Self {
        Self {
            router: Arc::new(router),
            style: Arc::new(style),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> axum::Router {
    use routes::home::{api_health, api_home};
    use routes::navigation::{api_resolve, api_routes, page_view};
    use routes::style::api_style;

    let api = axum::Router::new()
        .route("/api", get(api_home))
        .route("/api/", get(api_home))
        .route("/api/health", get(api_health))
        .route("/api/routes", get(api_routes))
        .route("/api/resolve", get(api_resolve))
        .route("/api/style", get(api_style))
        .layer(CorsLayer::permissive());

    api.fallback(page_view).with_state(state)
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, nav: &str, content: &str, font_family: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Ledger</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link rel="stylesheet" href="https://rsms.me/inter/inter.css">
    <style>
        body {{ font-family: {}; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
    <main class="max-w-5xl mx-auto p-6">{}</main>
</body>
</html>"#,
        ledgerview_router::views::escape_html(title),
        font_family,
        nav,
        content
    )
}

/// Top navigation bar
pub fn nav_bar(router: &ledgerview_router::Router, current_route: &str) -> String {
    let home = router
        .href(ledgerview_router::HOME_ROUTE, &ledgerview_router::Params::new())
        .unwrap_or_else(|_| "/".to_string());
    let active_class = if current_route == ledgerview_router::HOME_ROUTE {
        "text-indigo-600"
    } else {
        "text-gray-600 hover:text-indigo-600"
    };
    format!(
        r#"<nav class='bg-white border-b'><div class='max-w-5xl mx-auto px-6 py-3 flex items-center gap-6'>
    <h1 class='text-xl font-bold text-indigo-600'>Ledger</h1>
    <a href='{}' class='{}'>Ledgers</a>
</div></nav>"#,
        home, active_class
    )
}

/// Bind and serve until the server stops
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_addr();
    let base = state.router.base().to_string();
    let routes = state.router.table().summaries();

    let app = create_router(state);
    let listener = TcpListener::bind(&addr).await?;

    log::info!("Starting ledger UI server on http://{} (base {})", addr, base);
    for route in &routes {
        log::info!("  - {} ({}, {})", route.path, route.name, route.load);
    }
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, app).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
