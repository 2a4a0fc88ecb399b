//! Style routes - utility-CSS configuration

pub mod api;

pub use api::api_style;
