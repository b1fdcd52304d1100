// storefront/src/web/handlers/dashboard_handlers.rs

//! Staff-only product management, contact inbox and PDF export.

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::forms::{FormErrors, ProductForm};
use crate::models::{Product, ProductFilter, ProductInput, User};
use crate::services::{catalog_service, media_service, report_service};
use crate::services::catalog_service::ProductView;
use crate::state::AppState;
use crate::web::extractors::StaffUser;
use crate::web::responses::{page_context, redirect_with, render_page, Flash};

const PRODUCT_LIST_URL: &str = "/dashboard/products/";

// --- Request DTOs ---

#[derive(Deserialize, Debug, Default)]
pub struct ProductListQuery {
  #[serde(default)]
  pub q: String,
  /// `yes`, `no` or empty for all.
  #[serde(default)]
  pub active: String,
}

impl ProductListQuery {
  fn filter(&self) -> ProductFilter {
    let search = Some(self.q.trim().to_string()).filter(|q| !q.is_empty());
    let is_active = match self.active.as_str() {
      "yes" | "true" | "1" => Some(true),
      "no" | "false" | "0" => Some(false),
      _ => None,
    };
    ProductFilter { search, is_active }
  }
}

/// Multipart body of the add/edit product form.
#[derive(Debug, MultipartForm)]
pub struct ProductUpload {
  pub name: Option<Text<String>>,
  pub description: Option<Text<String>>,
  pub price: Option<Text<String>>,
  pub stock: Option<Text<String>>,
  pub is_active: Option<Text<String>>,
  pub image_clear: Option<Text<String>>,
  pub image: Option<TempFile>,
}

fn text(field: &Option<Text<String>>) -> String {
  field.as_ref().map(|t| t.0.clone()).unwrap_or_default()
}

fn checked(field: &Option<Text<String>>) -> bool {
  field.as_ref().is_some_and(|t| !matches!(t.0.as_str(), "" | "off" | "false" | "0"))
}

impl ProductUpload {
  fn form(&self) -> ProductForm {
    ProductForm {
      name: text(&self.name),
      description: text(&self.description),
      price: text(&self.price),
      stock: text(&self.stock),
      is_active: checked(&self.is_active),
    }
  }

  /// An empty file input still arrives as a zero-byte part.
  fn uploaded_image(&self) -> Option<&TempFile> {
    self.image.as_ref().filter(|file| file.size > 0)
  }
}

// --- Shared rendering ---

fn product_form_page(
  app_state: &AppState,
  staff: &User,
  action: &str,
  form: &ProductForm,
  errors: &FormErrors,
  current_image: Option<&str>,
) -> Result<HttpResponse, AppError> {
  let mut context = page_context(&app_state.config, Some(staff), &Flash::default());
  context.insert("action", action);
  context.insert("form", form);
  context.insert("errors", errors);
  context.insert("image_url", &current_image.map(|path| app_state.config.media_file_url(path)));
  render_page("dashboard/product_form.html", &context)
}

/// Validates the text fields and the image type, then stores the new image.
/// `Ok(Err(..))` carries errors for the form.
async fn product_input(
  app_state: &AppState,
  upload: &ProductUpload,
  current_image: Option<String>,
) -> Result<Result<ProductInput, FormErrors>, AppError> {
  let image_extension = upload
    .uploaded_image()
    .map(|file| media_service::image_extension(file.file_name.as_deref()))
    .transpose();

  let cleaned = upload.form().clean(current_image);
  let (mut input, extension) = match (cleaned, image_extension) {
    (Ok(input), Ok(extension)) => (input, extension),
    (cleaned, extension) => {
      let mut errors = cleaned.err().unwrap_or_default();
      if let Err(message) = extension {
        errors.add("image", message);
      }
      return Ok(Err(errors));
    }
  };

  match (upload.uploaded_image(), extension) {
    (Some(file), Some(extension)) => {
      let stored = media_service::save_product_image(&app_state.config.media_root, file.file.path(), &extension).await?;
      input.image = Some(stored);
    }
    _ if checked(&upload.image_clear) => input.image = None,
    _ => {}
  }
  Ok(Ok(input))
}

// --- Handler Implementations ---

#[instrument(name = "handler::dashboard_products", skip_all, fields(staff_id = staff.0.id))]
pub async fn product_list(
  app_state: web::Data<AppState>,
  staff: StaffUser,
  query: web::Query<ProductListQuery>,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  let products = app_state.store.list_products(&query.filter()).await?;
  let mut context = page_context(&app_state.config, Some(&staff.0), &flash);
  context.insert("products", &ProductView::many(&products, &app_state.config));
  context.insert("q", &query.q);
  context.insert("active", &query.active);
  render_page("dashboard/products_list.html", &context)
}

pub async fn product_create_form(app_state: web::Data<AppState>, staff: StaffUser) -> Result<HttpResponse, AppError> {
  product_form_page(&app_state, &staff.0, "Add", &ProductForm::blank(), &FormErrors::new(), None)
}

#[instrument(name = "handler::dashboard_product_create", skip_all, fields(staff_id = staff.0.id))]
pub async fn product_create(
  app_state: web::Data<AppState>,
  staff: StaffUser,
  upload: MultipartForm<ProductUpload>,
) -> Result<HttpResponse, AppError> {
  let upload = upload.into_inner();
  let input = match product_input(&app_state, &upload, None).await? {
    Ok(input) => input,
    Err(errors) => return product_form_page(&app_state, &staff.0, "Add", &upload.form(), &errors, None),
  };
  let product = catalog_service::create_product(app_state.store.as_ref(), &app_state.config.media_root, input).await?;
  info!(product_id = product.id, "Dashboard product created.");
  Ok(redirect_with(PRODUCT_LIST_URL, "message", "Product created successfully."))
}

async fn load_product(app_state: &AppState, product_id: i64) -> Result<Product, AppError> {
  catalog_service::get_product(app_state.store.as_ref(), product_id).await
}

pub async fn product_edit_form(
  app_state: web::Data<AppState>,
  staff: StaffUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product = load_product(&app_state, path.into_inner()).await?;
  product_form_page(
    &app_state,
    &staff.0,
    "Edit",
    &ProductForm::from_product(&product),
    &FormErrors::new(),
    product.image.as_deref(),
  )
}

#[instrument(name = "handler::dashboard_product_update", skip_all, fields(staff_id = staff.0.id, product_id = %path))]
pub async fn product_update(
  app_state: web::Data<AppState>,
  staff: StaffUser,
  path: web::Path<i64>,
  upload: MultipartForm<ProductUpload>,
) -> Result<HttpResponse, AppError> {
  let existing = load_product(&app_state, path.into_inner()).await?;
  let upload = upload.into_inner();
  let input = match product_input(&app_state, &upload, existing.image.clone()).await? {
    Ok(input) => input,
    Err(errors) => {
      return product_form_page(&app_state, &staff.0, "Edit", &upload.form(), &errors, existing.image.as_deref())
    }
  };
  catalog_service::update_product(app_state.store.as_ref(), &app_state.config.media_root, &existing, input).await?;
  Ok(redirect_with(PRODUCT_LIST_URL, "message", "Product updated successfully."))
}

pub async fn product_delete_confirm(
  app_state: web::Data<AppState>,
  staff: StaffUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product = load_product(&app_state, path.into_inner()).await?;
  let mut context = page_context(&app_state.config, Some(&staff.0), &Flash::default());
  context.insert("product", &ProductView::new(&product, &app_state.config));
  render_page("dashboard/product_confirm_delete.html", &context)
}

#[instrument(name = "handler::dashboard_product_delete", skip_all, fields(staff_id = staff.0.id, product_id = %path))]
pub async fn product_delete(
  app_state: web::Data<AppState>,
  staff: StaffUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product = load_product(&app_state, path.into_inner()).await?;
  catalog_service::delete_product(app_state.store.as_ref(), &app_state.config.media_root, &product).await?;
  Ok(redirect_with(PRODUCT_LIST_URL, "message", "Product deleted successfully."))
}

#[instrument(name = "handler::dashboard_contacts", skip_all, fields(staff_id = staff.0.id))]
pub async fn contact_list(
  app_state: web::Data<AppState>,
  staff: StaffUser,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  let contacts = app_state.store.list_contacts().await?;
  let mut context = page_context(&app_state.config, Some(&staff.0), &flash);
  context.insert("contacts", &contacts);
  render_page("dashboard/contacts_list.html", &context)
}

#[instrument(name = "handler::export_products_pdf", skip_all, fields(staff_id = staff.0.id))]
pub async fn export_products_pdf(app_state: web::Data<AppState>, staff: StaffUser) -> Result<HttpResponse, AppError> {
  let products = app_state.store.list_products(&ProductFilter::default()).await?;
  let pdf = web::block(move || report_service::render_products_pdf(&products))
    .await
    .map_err(|e| {
      warn!(error = %e, "PDF rendering task failed.");
      AppError::Internal("PDF generation failed.".to_string())
    })??;

  Ok(
    HttpResponse::Ok()
      .content_type("application/pdf")
      .insert_header((header::CONTENT_DISPOSITION, "attachment; filename=\"products.pdf\""))
      .body(pdf),
  )
}
