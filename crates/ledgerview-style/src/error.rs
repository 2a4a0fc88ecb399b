//! Error types for ledgerview-style

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Content file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid content pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Unreadable path {path}: {message}")]
    Unreadable { path: String, message: String },
}
