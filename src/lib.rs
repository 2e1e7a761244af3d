//! CareMatch Backend Library
//!
//! REST API for the care-matching marketplace: JWT sessions over four
//! role-partitioned user tables, role-guarded dashboards, SQLite storage.

pub mod api;
pub mod auth;
pub mod config;
pub mod envelope;
pub mod middleware;
pub mod store;

pub use api::{router, AppState};
pub use config::Config;
