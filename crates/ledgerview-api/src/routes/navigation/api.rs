//! Navigation API endpoints - JSON API

use crate::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::Json;
use ledgerview_router::RouteSummary;
use serde::Deserialize;

pub async fn api_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    Json(state.router.table().summaries())
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: Option<String>,
}

pub async fn api_resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let path = query.path.filter(|p| !p.is_empty()).ok_or_else(|| ApiError::BadRequest {
        message: "query parameter 'path' is required".to_string(),
    })?;

    let resolved = state.router.resolve(&path).await?;
    Ok(Json(resolved.to_json()))
}
