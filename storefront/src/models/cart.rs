// storefront/src/models/cart.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cart {
  pub id: i64,
  pub user_id: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A cart item joined with the product fields the cart views need.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
  pub product_id: i64,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
  pub image: Option<String>,
}

impl CartLine {
  pub fn subtotal(&self) -> Decimal {
    self.price * Decimal::from(self.quantity)
  }
}
