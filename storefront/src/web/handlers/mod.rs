// storefront/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod cart_handlers;
pub mod dashboard_handlers;
pub mod page_handlers;
pub mod product_handlers;
pub mod profile_handlers;
pub mod ws_handlers;
