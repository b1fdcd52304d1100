// storefront/src/web/handlers/cart_handlers.rs

use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::errors::AppError;
use crate::realtime::{user_group, CartEvent, CartEventKind};
use crate::services::cart_service::{self, CartSummary, CartUpdateOutcome, CartUpdateRequest};
use crate::state::AppState;
use crate::web::extractors::ApiUser;

// --- Response DTO ---
#[derive(Serialize, Debug)]
pub struct CartMutationResponse {
  pub message: String,
  #[serde(flatten)]
  pub cart: CartSummary,
}

fn require_post(req: &HttpRequest) -> Result<(), AppError> {
  if req.method() == Method::POST {
    Ok(())
  } else {
    Err(AppError::Validation("Invalid request method.".to_string()))
  }
}

/// Pushes the fresh cart to the user's own room so their other open pages re-render.
fn broadcast_cart(app_state: &AppState, user_id: i64, cart: &CartSummary) -> Result<(), AppError> {
  let data = serde_json::to_value(cart).map_err(|e| AppError::Internal(format!("Failed to encode cart: {}", e)))?;
  let delivered = app_state.rooms.publish(&user_group(user_id), CartEvent::new(CartEventKind::CartUpdate, data));
  debug!(user_id, delivered, "Cart update broadcast.");
  Ok(())
}

// --- Handler Implementations ---

#[instrument(name = "handler::get_cart", skip_all, fields(user_id = api_user.user.id))]
pub async fn get_cart(app_state: web::Data<AppState>, api_user: ApiUser) -> Result<HttpResponse, AppError> {
  let cart = cart_service::get_cart(app_state.store.as_ref(), &app_state.config, api_user.user.id).await?;
  Ok(HttpResponse::Ok().json(cart))
}

/// `POST {product_id, quantity}`; quantity 0 removes the line.
#[instrument(name = "handler::update_cart", skip_all, fields(user_id = api_user.user.id))]
pub async fn update_cart(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  api_user: ApiUser,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  require_post(&req)?;
  let payload: Value = serde_json::from_slice(&body).map_err(|e| {
    warn!(error = %e, "Malformed cart update body.");
    AppError::Validation("Invalid JSON.".to_string())
  })?;
  let request = CartUpdateRequest::from_json(&payload)?;

  let user_id = api_user.user.id;
  let outcome = cart_service::update_cart(app_state.store.as_ref(), user_id, &request).await?;
  let message = match outcome {
    CartUpdateOutcome::Updated(item) => {
      info!(product_id = item.product_id, quantity = item.quantity, "Cart updated via API.");
      "Cart updated."
    }
    CartUpdateOutcome::Removed { product_id } => {
      info!(product_id, "Cart item removed via API.");
      "Item removed from cart."
    }
  };

  let cart = cart_service::get_cart(app_state.store.as_ref(), &app_state.config, user_id).await?;
  broadcast_cart(&app_state, user_id, &cart)?;
  Ok(HttpResponse::Ok().json(CartMutationResponse { message: message.to_string(), cart }))
}

#[instrument(name = "handler::clear_cart", skip_all, fields(user_id = api_user.user.id))]
pub async fn clear_cart(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  api_user: ApiUser,
) -> Result<HttpResponse, AppError> {
  require_post(&req)?;
  let user_id = api_user.user.id;
  cart_service::clear_cart(app_state.store.as_ref(), user_id).await?;

  let cart = cart_service::get_cart(app_state.store.as_ref(), &app_state.config, user_id).await?;
  broadcast_cart(&app_state, user_id, &cart)?;
  Ok(HttpResponse::Ok().json(CartMutationResponse { message: "Cart cleared.".to_string(), cart }))
}
