// storefront/src/services/mod.rs

pub mod account_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod media_service;
pub mod report_service;
