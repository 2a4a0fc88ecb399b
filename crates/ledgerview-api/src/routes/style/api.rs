//! Style API endpoints - JSON API

use crate::AppState;
use axum::Json;

pub async fn api_style(state: axum::extract::State<AppState>) -> Json<serde_json::Value> {
    Json(state.style.to_json())
}
