// storefront/src/web/handlers/page_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::forms::{ContactForm, FormErrors};
use crate::models::User;
use crate::realtime::user_room;
use crate::services::cart_service::cart_total;
use crate::services::catalog_service::{self, format_price, ProductView};
use crate::state::AppState;
use crate::web::extractors::{MaybeUser, PageUser};
use crate::web::responses::{page_context, redirect_with, render_page, Flash};

#[instrument(name = "handler::index", skip_all)]
pub async fn index(
  app_state: web::Data<AppState>,
  user: MaybeUser,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  let products = catalog_service::active_products(app_state.store.as_ref()).await?;
  let mut context = page_context(&app_state.config, user.user(), &flash);
  context.insert("products", &ProductView::many(&products, &app_state.config));
  render_page("index.html", &context)
}

/// The page itself is public; its script loads the cart through the API.
#[instrument(name = "handler::cart_page", skip_all)]
pub async fn cart_page(
  app_state: web::Data<AppState>,
  user: MaybeUser,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  let mut context = page_context(&app_state.config, user.user(), &flash);
  if let Some(user) = user.user() {
    context.insert("cart_room", &user_room(user.id));
  }
  render_page("cart.html", &context)
}

#[instrument(name = "handler::order_page", skip_all, fields(user_id = page_user.user.id))]
pub async fn order_page(
  app_state: web::Data<AppState>,
  page_user: PageUser,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  let store = app_state.store.as_ref();
  let cart = store.get_or_create_cart(page_user.user.id).await?;
  let lines = store.cart_lines(cart.id).await?;
  let rows: Vec<_> = lines
    .iter()
    .map(|line| {
      json!({
        "name": line.name,
        "price": format_price(line.price),
        "quantity": line.quantity,
        "subtotal": format_price(line.subtotal()),
      })
    })
    .collect();

  let mut context = page_context(&app_state.config, Some(&page_user.user), &flash);
  context.insert("lines", &rows);
  context.insert("total", &format_price(cart_total(&lines)));
  render_page("order.html", &context)
}

fn contact_page(
  app_state: &AppState,
  user: Option<&User>,
  flash: &Flash,
  form: &ContactForm,
  errors: &FormErrors,
) -> Result<HttpResponse, AppError> {
  let mut context = page_context(&app_state.config, user, flash);
  context.insert("form", form);
  context.insert("errors", errors);
  render_page("contact.html", &context)
}

pub async fn contact_form(
  app_state: web::Data<AppState>,
  user: MaybeUser,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  contact_page(&app_state, user.user(), &flash, &ContactForm::default(), &FormErrors::new())
}

#[instrument(name = "handler::contact_submit", skip_all)]
pub async fn contact_submit(
  app_state: web::Data<AppState>,
  user: MaybeUser,
  form: web::Form<ContactForm>,
) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  match form.clean() {
    Ok(contact) => {
      let saved = app_state.store.create_contact(contact).await?;
      info!(contact_id = saved.id, "Contact message stored.");
      Ok(redirect_with(
        "/contact/",
        "message",
        "Thanks for reaching out. We will get back to you soon.",
      ))
    }
    Err(errors) => contact_page(&app_state, user.user(), &Flash::default(), &form, &errors),
  }
}

pub async fn health(app_state: web::Data<AppState>) -> HttpResponse {
  HttpResponse::Ok().json(json!({
    "status": "ok",
    "rooms": app_state.rooms.room_count(),
  }))
}

/// Fallback for unmatched routes.
pub async fn not_found(app_state: web::Data<AppState>, user: MaybeUser) -> Result<HttpResponse, AppError> {
  let mut context = page_context(&app_state.config, user.user(), &Flash::default());
  context.insert("status", &404);
  context.insert("detail", "The page you requested does not exist.");
  let mut response = render_page("error.html", &context)?;
  *response.status_mut() = actix_web::http::StatusCode::NOT_FOUND;
  Ok(response)
}
