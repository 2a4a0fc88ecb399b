//! Home routes - service identity and health

pub mod api;

pub use api::{api_health, api_home, Home};
