// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub stock: i32,
  pub is_active: bool,
  /// Path relative to the media root, e.g. `products/5f0c....png`.
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Validated values written by the dashboard on create and update.
#[derive(Debug, Clone)]
pub struct ProductInput {
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub stock: i32,
  pub is_active: bool,
  pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
  /// Case-insensitive substring of the product name.
  pub search: Option<String>,
  pub is_active: Option<bool>,
}

impl ProductFilter {
  pub fn active_only() -> Self {
    Self { search: None, is_active: Some(true) }
  }

  pub fn matches(&self, product: &Product) -> bool {
    if let Some(active) = self.is_active {
      if product.is_active != active {
        return false;
      }
    }
    match &self.search {
      Some(term) => product.name.to_lowercase().contains(&term.to_lowercase()),
      None => true,
    }
  }
}
