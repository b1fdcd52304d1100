// storefront/src/lib.rs

//! Storefront: product catalog, per-user carts with a JSON API and a
//! WebSocket room relay, accounts, a contact form and a staff dashboard with
//! PDF export.

pub mod config;
pub mod errors;
pub mod forms;
pub mod models;
pub mod realtime;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::AppState;
