//! Home API endpoints - JSON API

use axum::Json;
use serde::Serialize;

const NAME: Option<&str> = option_env!("CARGO_PKG_NAME");
const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");
const REPOSITORY: Option<&str> = option_env!("CARGO_PKG_REPOSITORY");

/// Package identity reported by `/api`
#[derive(Debug, Serialize)]
pub struct Home {
    pub name: String,
    pub version: String,
    pub repository: String,
}

impl Home {
    pub fn current() -> Self {
        let or_null = |value: Option<&str>| {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or("NULL")
                .to_string()
        };
        Self {
            name: or_null(NAME),
            version: or_null(VERSION),
            repository: or_null(REPOSITORY),
        }
    }
}

pub async fn api_home() -> Json<Home> {
    Json(Home::current())
}

/// Health check endpoint
pub async fn api_health() -> &'static str {
    "OK"
}
