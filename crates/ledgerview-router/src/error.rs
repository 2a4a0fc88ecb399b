//! Error types for ledgerview-router
//!
//! Every resolver failure carries a stable code and a severity so the
//! rendering layer can decide between an error page and a hard failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No pattern matches the requested path
    RouteNotFound,
    /// A deferred view failed to load
    ViewLoadError,
    /// A path parameter is missing or malformed
    InvalidParameter,
    /// A path pattern could not be parsed
    InvalidPattern,
    /// Two routes share a name or a pattern shape
    DuplicateRoute,
    /// A newer navigation superseded this one
    NavigationCancelled,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::RouteNotFound => write!(f, "ROUTE_NOT_FOUND"),
            ErrorCode::ViewLoadError => write!(f, "VIEW_LOAD_ERROR"),
            ErrorCode::InvalidParameter => write!(f, "INVALID_PARAMETER"),
            ErrorCode::InvalidPattern => write!(f, "INVALID_PATTERN"),
            ErrorCode::DuplicateRoute => write!(f, "DUPLICATE_ROUTE"),
            ErrorCode::NavigationCancelled => write!(f, "NAVIGATION_CANCELLED"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Debug information
    Debug,
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - the route table itself is unusable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Debug => write!(f, "debug"),
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for ledgerview-router
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    #[error("Route not found: {path}")]
    RouteNotFound { path: String },

    #[error("Failed to load view for route '{route}': {message}")]
    ViewLoad { route: String, message: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Duplicate route: {key}")]
    DuplicateRoute { key: String },

    #[error("Navigation to {path} was superseded")]
    NavigationCancelled { path: String },
}

impl RouterError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            RouterError::RouteNotFound { .. } => ErrorCode::RouteNotFound,
            RouterError::ViewLoad { .. } => ErrorCode::ViewLoadError,
            RouterError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            RouterError::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            RouterError::DuplicateRoute { .. } => ErrorCode::DuplicateRoute,
            RouterError::NavigationCancelled { .. } => ErrorCode::NavigationCancelled,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RouterError::RouteNotFound { .. } => ErrorSeverity::Info,
            RouterError::ViewLoad { .. } => ErrorSeverity::Error,
            RouterError::InvalidParameter { .. } => ErrorSeverity::Warning,
            RouterError::InvalidPattern { .. } => ErrorSeverity::Critical,
            RouterError::DuplicateRoute { .. } => ErrorSeverity::Critical,
            RouterError::NavigationCancelled { .. } => ErrorSeverity::Debug,
        }
    }

    /// Whether the rendering layer can show an error state and keep going
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.severity(), ErrorSeverity::Critical)
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            RouterError::RouteNotFound { path } => {
                details = details.with_detail(serde_json::json!({ "path": path }));
                details = details.with_suggestion(
                    "Use the /api/routes endpoint to list the declared routes.".to_string(),
                );
            }
            RouterError::ViewLoad { route, message } => {
                details = details.with_detail(serde_json::json!({ "route": route, "cause": message }));
                details = details.with_suggestion(
                    "Check that the view template exists and is readable.".to_string(),
                );
                details = details.with_suggestion(
                    "Retry the navigation; failed loads are not cached.".to_string(),
                );
            }
            RouterError::InvalidParameter { name, .. } => {
                details = details.with_detail(serde_json::json!({ "parameter": name }));
            }
            RouterError::InvalidPattern { pattern, .. } => {
                details = details.with_detail(serde_json::json!({ "pattern": pattern }));
                details = details.with_suggestion(
                    "Parameter segments look like ':name' with letters, digits and '_'.".to_string(),
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with RouterError
pub type RouterResult<T> = Result<T, RouterError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Navigation ticket, when the error happened inside a navigation
    pub navigation: Option<u64>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: String) -> Self {
        Self {
            navigation: None,
            operation,
            data: serde_json::json!({}),
        }
    }

    /// Add navigation ticket
    pub fn with_navigation(mut self, ticket: u64) -> Self {
        self.navigation = Some(ticket);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &RouterError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &RouterError, context: &ErrorContext) {
        let level = match error.severity() {
            ErrorSeverity::Debug => log::Level::Debug,
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        };
        log::log!(
            target: "ledgerview::error",
            level,
            "[{}] {} - Operation: {} - Navigation: {:?}",
            error.code(),
            error,
            context.operation,
            context.navigation
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "ledgerview::error",
            "WARNING: {} - Operation: {} - Navigation: {:?}",
            message,
            context.operation,
            context.navigation
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::RouteNotFound.to_string(), "ROUTE_NOT_FOUND");
        assert_eq!(ErrorCode::ViewLoadError.to_string(), "VIEW_LOAD_ERROR");
        assert_eq!(ErrorCode::NavigationCancelled.to_string(), "NAVIGATION_CANCELLED");
    }

    #[test]
    fn test_router_error_severity() {
        let error = RouterError::RouteNotFound { path: "/unknown".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Info);
        assert!(error.is_recoverable());

        let error = RouterError::DuplicateRoute { key: "ledger".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(!error.is_recoverable());

        let error = RouterError::ViewLoad {
            route: "ledger".to_string(),
            message: "io".to_string(),
        };
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_route_not_found_details() {
        let error = RouterError::RouteNotFound { path: "/unknown".to_string() };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::RouteNotFound);
        assert!(details.message.contains("/unknown"));
        assert_eq!(details.details, Some(serde_json::json!({ "path": "/unknown" })));
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_details_serialize_code() {
        let error = RouterError::InvalidParameter {
            name: "ledger_id".to_string(),
            reason: "missing".to_string(),
        };
        let json = serde_json::to_value(error.to_details()).unwrap();
        assert_eq!(json["code"], "INVALID_PARAMETER");
        assert!(json.get("suggestions").is_none());
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("navigate".to_string())
            .with_navigation(7)
            .with_data("path", serde_json::json!("/ledger/1"));

        assert_eq!(context.operation, "navigate");
        assert_eq!(context.navigation, Some(7));
        assert_eq!(context.data["path"], "/ledger/1");
    }
}
