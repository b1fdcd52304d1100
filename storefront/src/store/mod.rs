// storefront/src/store/mod.rs

//! Persistence seam. Handlers and services only talk to [`Store`]; the
//! backend is chosen from `DATABASE_URL` at startup.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{
  Cart, CartItem, CartLine, Contact, NewContact, NewUser, Product, ProductFilter, ProductInput, ProfileUpdate, Session,
  User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
  // --- Users ---

  /// Inserts the user and provisions its cart in the same unit of work.
  async fn create_user(&self, new_user: NewUser) -> Result<User>;
  async fn find_user(&self, user_id: i64) -> Result<Option<User>>;
  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
  /// Case-insensitive; `except_user` lets a profile keep its own username.
  async fn username_taken(&self, username: &str, except_user: Option<i64>) -> Result<bool>;
  /// Case-insensitive; `except_user` lets a profile keep its own address.
  async fn email_taken(&self, email: &str, except_user: Option<i64>) -> Result<bool>;
  async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<Option<User>>;
  async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> Result<()>;

  // --- Sessions ---

  async fn create_session(&self, user_id: i64, expires_at: DateTime<Utc>) -> Result<Session>;
  async fn find_session(&self, token: Uuid) -> Result<Option<Session>>;
  async fn delete_session(&self, token: Uuid) -> Result<()>;
  /// Revokes every session of `user_id` except `keep`; returns how many were removed.
  async fn delete_other_sessions(&self, user_id: i64, keep: Uuid) -> Result<u64>;

  // --- Products ---

  /// Newest first.
  async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>>;
  async fn find_product(&self, product_id: i64) -> Result<Option<Product>>;
  /// Active products whose name equals `name`, ignoring case.
  async fn find_active_products_named(&self, name: &str) -> Result<Vec<Product>>;
  async fn create_product(&self, input: ProductInput) -> Result<Product>;
  async fn update_product(&self, product_id: i64, input: ProductInput) -> Result<Option<Product>>;
  async fn delete_product(&self, product_id: i64) -> Result<bool>;

  // --- Carts ---

  async fn find_cart(&self, user_id: i64) -> Result<Option<Cart>>;
  async fn get_or_create_cart(&self, user_id: i64) -> Result<Cart>;
  /// Items of the cart joined with their product, in insertion order.
  async fn cart_lines(&self, cart_id: i64) -> Result<Vec<CartLine>>;
  /// Sets the quantity of `product_id` in the cart, inserting the row if needed.
  async fn upsert_cart_item(&self, cart_id: i64, product_id: i64, quantity: i32) -> Result<CartItem>;
  async fn remove_cart_item(&self, cart_id: i64, product_id: i64) -> Result<bool>;
  async fn clear_cart(&self, cart_id: i64) -> Result<u64>;

  // --- Contact messages ---

  async fn create_contact(&self, contact: NewContact) -> Result<Contact>;
  /// Newest first.
  async fn list_contacts(&self) -> Result<Vec<Contact>>;
}

/// Opens the backend named by `config.database_url`.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn Store>> {
  let url = config.database_url.as_str();
  if url.starts_with("memory:") {
    tracing::warn!("Using the in-memory store; data is lost on restart.");
    return Ok(Arc::new(MemoryStore::new()));
  }
  if url.starts_with("postgres://") || url.starts_with("postgresql://") {
    let store = PgStore::connect(url, config.database_max_connections).await?;
    store.run_migrations().await?;
    return Ok(Arc::new(store));
  }
  Err(AppError::Config(format!(
    "Unsupported DATABASE_URL scheme in '{}'; expected postgres:// or memory://",
    url.split("://").next().unwrap_or(url)
  )))
}
