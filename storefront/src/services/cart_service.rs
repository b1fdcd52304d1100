// storefront/src/services/cart_service.rs

//! Cart reads and writes for the authenticated user.
//!
//! `update_cart` keeps the shape of the old add-to-cart flow: validate the
//! quantity, load the product, then write the row.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{CartItem, CartLine};
use crate::store::Store;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// One line of the JSON cart payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartItemView {
  pub product_id: i64,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
  pub image_url: Option<String>,
}

/// `{items: [...], total}` as returned by the cart API and pushed to cart rooms.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartSummary {
  pub items: Vec<CartItemView>,
  pub total: Decimal,
}

impl CartSummary {
  pub fn from_lines(lines: Vec<CartLine>, config: &AppConfig) -> Self {
    let total = cart_total(&lines);
    let items = lines
      .into_iter()
      .map(|line| CartItemView {
        product_id: line.product_id,
        image_url: line.image.as_deref().map(|path| config.media_file_url(path)),
        name: line.name,
        price: line.price,
        quantity: line.quantity,
      })
      .collect();
    Self { items, total }
  }

  pub fn item_count(&self) -> i64 {
    self.items.iter().map(|i| i64::from(i.quantity)).sum()
  }
}

/// Σ quantity × price, computed on every read.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
  lines.iter().map(CartLine::subtotal).sum()
}

/// Body of `POST /api/cart/update/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdateRequest {
  pub product_id: i64,
  pub quantity: i64,
}

impl CartUpdateRequest {
  /// A missing or non-integer `product_id` cannot name a product and is
  /// reported as not found; `quantity` defaults to 1 and must be an integer.
  pub fn from_json(body: &Value) -> Result<Self> {
    let Value::Object(fields) = body else {
      return Err(AppError::Validation("Request body must be a JSON object.".to_string()));
    };
    let product_id = fields
      .get("product_id")
      .and_then(integer_value)
      .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;
    let quantity = match fields.get("quantity") {
      None | Some(Value::Null) => 1,
      Some(value) => integer_value(value)
        .ok_or_else(|| AppError::Validation("Quantity must be an integer.".to_string()))?,
    };
    Ok(Self { product_id, quantity })
  }
}

/// Accepts JSON integers and integer strings such as `"3"`, as HTML forms send them.
fn integer_value(value: &Value) -> Option<i64> {
  match value {
    Value::Number(n) => n.as_i64(),
    Value::String(s) => s.trim().parse::<i64>().ok(),
    _ => None,
  }
}

#[derive(Debug, Clone)]
pub enum CartUpdateOutcome {
  Updated(CartItem),
  Removed { product_id: i64 },
}

#[instrument(name = "cart_service::get_cart", skip(store, config))]
pub async fn get_cart(store: &dyn Store, config: &AppConfig, user_id: i64) -> Result<CartSummary> {
  let cart = store.get_or_create_cart(user_id).await?;
  let lines = store.cart_lines(cart.id).await?;
  Ok(CartSummary::from_lines(lines, config))
}

#[instrument(name = "cart_service::update_cart", skip(store))]
pub async fn update_cart(store: &dyn Store, user_id: i64, request: &CartUpdateRequest) -> Result<CartUpdateOutcome> {
  // Step 1: validate quantity. Zero is a removal, anything else below one is rejected.
  if request.quantity != 0 && request.quantity < 1 {
    warn!(quantity = request.quantity, "Rejected cart quantity.");
    return Err(AppError::Validation("Quantity must be at least 1.".to_string()));
  }
  let quantity = i32::try_from(request.quantity)
    .map_err(|_| AppError::Validation("Quantity is too large.".to_string()))?;

  // Step 2: the product must exist.
  let product = store
    .find_product(request.product_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

  // Step 3: write.
  let cart = store.get_or_create_cart(user_id).await?;
  if quantity == 0 {
    let removed = store.remove_cart_item(cart.id, product.id).await?;
    info!(product_id = product.id, removed, "Cart item removed.");
    return Ok(CartUpdateOutcome::Removed { product_id: product.id });
  }
  let item = store.upsert_cart_item(cart.id, product.id, quantity).await?;
  info!(product_id = product.id, quantity, "Cart item saved.");
  Ok(CartUpdateOutcome::Updated(item))
}

#[instrument(name = "cart_service::clear_cart", skip(store))]
pub async fn clear_cart(store: &dyn Store, user_id: i64) -> Result<u64> {
  let cart = store.get_or_create_cart(user_id).await?;
  let removed = store.clear_cart(cart.id).await?;
  info!(removed, "Cart cleared.");
  Ok(removed)
}
