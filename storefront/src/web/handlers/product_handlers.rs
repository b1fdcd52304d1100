// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::catalog_service::{self, ProductView};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct FindProductQuery {
  #[serde(default)]
  pub name: String,
}

/// `GET /api/products/find/?name=`: exact (case-insensitive) match first, then substring.
#[instrument(name = "handler::find_product", skip(app_state), fields(name = %query.name))]
pub async fn find_product(
  app_state: web::Data<AppState>,
  query: web::Query<FindProductQuery>,
) -> Result<HttpResponse, AppError> {
  let (kind, products) = catalog_service::find_product_by_name(app_state.store.as_ref(), &query.name).await?;
  info!(found = products.len(), "Product lookup answered.");
  Ok(HttpResponse::Ok().json(json!({
    "match": kind,
    "products": ProductView::many(&products, &app_state.config),
  })))
}
