//! Route modules for the API server
//!
//! - home: service identity and health
//! - navigation: route table listing, resolution and history-mode pages
//! - style: utility-CSS configuration
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTML page rendering

pub mod home;
pub mod navigation;
pub mod style;
