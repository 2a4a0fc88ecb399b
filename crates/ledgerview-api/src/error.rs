//! Error types for ledgerview-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledgerview_router::{ErrorCode, RouterError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Router(#[from] RouterError),

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

/// HTTP status for a resolver failure
pub fn status_for(error: &RouterError) -> StatusCode {
    match error.code() {
        ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidParameter => StatusCode::BAD_REQUEST,
        ErrorCode::ViewLoadError => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::NavigationCancelled => StatusCode::CONFLICT,
        ErrorCode::InvalidPattern | ErrorCode::DuplicateRoute => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Router(error) => status_for(error),
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match &self {
            ApiError::Router(error) => serde_json::to_value(error.to_details()).unwrap_or_default(),
            ApiError::BadRequest { message } => serde_json::json!({
                "code": "BAD_REQUEST",
                "message": message,
            }),
        };
        let body = serde_json::json!({ "success": false, "error": error });
        (self.status(), Json(body)).into_response()
    }
}
