// storefront/src/errors.rs

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// Page routes answer anonymous visitors with a redirect to the login form
  /// instead of a JSON 401.
  #[error("Login required to access {next}")]
  LoginRequired { next: String },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Template Error: {0}")]
  Template(#[from] tera::Error),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Human readable message without the variant prefix, as shown to API clients.
  pub fn client_message(&self) -> String {
    match self {
      AppError::Validation(m)
      | AppError::Auth(m)
      | AppError::Forbidden(m)
      | AppError::NotFound(m)
      | AppError::Internal(m) => m.clone(),
      AppError::LoginRequired { .. } => "Authentication required.".to_string(),
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Template(e) => format!("Template rendering failed: {}", e),
      AppError::Io(e) => format!("I/O operation failed: {}", e),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

/// Maps a PostgreSQL unique violation (SQLSTATE 23505) to a validation error
/// carrying `message`; every other database error is passed through.
pub fn unique_violation(message: &'static str) -> impl Fn(sqlx::Error) -> AppError {
  move |err| match &err {
    sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
      AppError::Validation(message.to_string())
    }
    _ => AppError::Sqlx(err),
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::LoginRequired { .. } => StatusCode::FOUND,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Template(_)
      | AppError::Io(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::LoginRequired { next } => {
        tracing::debug!(next = %next, "Redirecting anonymous visitor to login");
        let query = serde_urlencoded::to_string([("next", next.as_str())]).unwrap_or_default();
        HttpResponse::Found()
          .insert_header((header::LOCATION, format!("/login/?{}", query)))
          .finish()
      }
      AppError::Validation(_) | AppError::Auth(_) | AppError::Forbidden(_) | AppError::NotFound(_) => {
        tracing::warn!(application_error = %self, "Responding with client error");
        HttpResponse::build(self.status_code()).json(json!({"error": self.client_message()}))
      }
      _ => {
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::build(self.status_code()).json(json!({"error": self.client_message()}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
