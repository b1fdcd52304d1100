// storefront/src/web/extractors.rs

//! Request extractors that resolve the session cookie to a user.
//!
//! - [`ApiUser`] rejects anonymous callers with a JSON 401.
//! - [`PageUser`] redirects anonymous visitors to the login form.
//! - [`StaffUser`] additionally answers signed-in non-staff users with 403.
//! - [`MaybeUser`] never rejects.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::{AppError, Result};
use crate::models::{Session, User};
use crate::services::auth_service;
use crate::state::AppState;

async fn current_session(req: &HttpRequest) -> Result<Option<(Session, User)>> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
  let Some(cookie) = req.cookie(&state.config.session_cookie_name) else {
    return Ok(None);
  };
  auth_service::resolve_session(state.store.as_ref(), cookie.value()).await
}

fn login_redirect(req: &HttpRequest) -> AppError {
  let next = req
    .uri()
    .path_and_query()
    .map(|pq| pq.as_str().to_string())
    .unwrap_or_else(|| req.path().to_string());
  AppError::LoginRequired { next }
}

#[derive(Debug, Clone)]
pub struct ApiUser {
  pub user: User,
  pub session: Session,
}

impl FromRequest for ApiUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move {
      match current_session(&req).await? {
        Some((session, user)) => Ok(ApiUser { user, session }),
        None => {
          warn!(path = %req.path(), "Rejected anonymous API request.");
          Err(AppError::Auth("Authentication required.".to_string()))
        }
      }
    })
  }
}

#[derive(Debug, Clone)]
pub struct PageUser {
  pub user: User,
  pub session: Session,
}

impl FromRequest for PageUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move {
      match current_session(&req).await? {
        Some((session, user)) => Ok(PageUser { user, session }),
        None => Err(login_redirect(&req)),
      }
    })
  }
}

#[derive(Debug, Clone)]
pub struct StaffUser(pub User);

impl FromRequest for StaffUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move {
      match current_session(&req).await? {
        Some((_, user)) if user.is_staff => Ok(StaffUser(user)),
        Some((_, user)) => {
          warn!(user_id = user.id, path = %req.path(), "Non-staff user denied dashboard access.");
          Err(AppError::Forbidden("Staff access required.".to_string()))
        }
        None => Err(login_redirect(&req)),
      }
    })
  }
}

#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
  pub fn user(&self) -> Option<&User> {
    self.0.as_ref()
  }
}

impl FromRequest for MaybeUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move { Ok(MaybeUser(current_session(&req).await?.map(|(_, user)| user))) })
  }
}
