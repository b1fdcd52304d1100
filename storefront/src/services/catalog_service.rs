// storefront/src/services/catalog_service.rs

//! Storefront product lookups and the staff dashboard's product writes.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{Product, ProductFilter, ProductInput};
use crate::services::media_service;
use crate::store::Store;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Public view of a product as used by templates and the find API.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub price_display: String,
  pub stock: i32,
  pub is_active: bool,
  pub image_url: Option<String>,
  pub created_at: String,
}

impl ProductView {
  pub fn new(product: &Product, config: &AppConfig) -> Self {
    Self {
      id: product.id,
      name: product.name.clone(),
      description: product.description.clone(),
      price: product.price,
      price_display: format_price(product.price),
      stock: product.stock,
      is_active: product.is_active,
      image_url: product.image.as_deref().map(|p| config.media_file_url(p)),
      created_at: product.created_at.format("%Y-%m-%d %H:%M").to_string(),
    }
  }

  pub fn many(products: &[Product], config: &AppConfig) -> Vec<Self> {
    products.iter().map(|p| Self::new(p, config)).collect()
  }
}

/// Two decimal places, e.g. `5` -> `5.00`.
pub fn format_price(price: Decimal) -> String {
  let mut rounded = price.round_dp(2);
  rounded.rescale(2);
  rounded.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMatch {
  Exact,
  Partial,
}

#[instrument(name = "catalog_service::active_products", skip(store))]
pub async fn active_products(store: &dyn Store) -> Result<Vec<Product>> {
  store.list_products(&ProductFilter::active_only()).await
}

/// Case-insensitive exact match among active products, falling back to a
/// substring match when nothing matches exactly.
#[instrument(name = "catalog_service::find_product_by_name", skip(store))]
pub async fn find_product_by_name(store: &dyn Store, name: &str) -> Result<(NameMatch, Vec<Product>)> {
  let name = name.trim();
  if name.is_empty() {
    return Err(AppError::Validation("Product name is required.".to_string()));
  }

  let exact = store.find_active_products_named(name).await?;
  if !exact.is_empty() {
    return Ok((NameMatch::Exact, exact));
  }

  let filter = ProductFilter { search: Some(name.to_string()), is_active: Some(true) };
  let partial = store.list_products(&filter).await?;
  if partial.is_empty() {
    warn!("No product matched the requested name.");
    return Err(AppError::NotFound(format!("No product found matching '{}'.", name)));
  }
  Ok((NameMatch::Partial, partial))
}

pub async fn get_product(store: &dyn Store, product_id: i64) -> Result<Product> {
  store
    .find_product(product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", product_id)))
}

/// Removes an image stored for a write that did not go through.
async fn discard_new_image(media_root: &Path, image: Option<&str>) {
  if let Some(path) = image {
    if let Err(e) = media_service::delete_media_file(media_root, path).await {
      warn!(path, error = %e, "Failed to remove orphaned product image.");
    }
  }
}

#[instrument(name = "catalog_service::create_product", skip(store, media_root, input), fields(name = %input.name))]
pub async fn create_product(store: &dyn Store, media_root: &Path, input: ProductInput) -> Result<Product> {
  let new_image = input.image.clone();
  let product = match store.create_product(input).await {
    Ok(product) => product,
    Err(e) => {
      discard_new_image(media_root, new_image.as_deref()).await;
      return Err(e);
    }
  };
  info!(product_id = product.id, "Product created.");
  Ok(product)
}

/// Saves the new values and removes the previous image file when it was
/// replaced or cleared. A newly uploaded image is removed again if the row
/// could not be written.
#[instrument(name = "catalog_service::update_product", skip(store, media_root, existing, input), fields(product_id = existing.id))]
pub async fn update_product(
  store: &dyn Store,
  media_root: &Path,
  existing: &Product,
  input: ProductInput,
) -> Result<Product> {
  let stale_image = match (&existing.image, &input.image) {
    (Some(old), Some(new)) if old != new => Some(old.clone()),
    (Some(old), None) => Some(old.clone()),
    _ => None,
  };
  let new_image = input.image.clone().filter(|image| existing.image.as_ref() != Some(image));
  let written = store
    .update_product(existing.id, input)
    .await
    .and_then(|product| product.ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found.", existing.id))));
  let product = match written {
    Ok(product) => product,
    Err(e) => {
      discard_new_image(media_root, new_image.as_deref()).await;
      return Err(e);
    }
  };
  if let Some(path) = stale_image {
    media_service::delete_media_file(media_root, &path).await?;
  }
  info!("Product updated.");
  Ok(product)
}

#[instrument(name = "catalog_service::delete_product", skip(store, media_root, product), fields(product_id = product.id))]
pub async fn delete_product(store: &dyn Store, media_root: &Path, product: &Product) -> Result<()> {
  if !store.delete_product(product.id).await? {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product.id)));
  }
  if let Some(path) = &product.image {
    media_service::delete_media_file(media_root, path).await?;
  }
  info!("Product deleted.");
  Ok(())
}
