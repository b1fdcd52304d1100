// storefront/src/web/responses.rs

//! Page rendering, redirects with flash messages, and the session cookie.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::HttpResponse;
use serde::Deserialize;
use tera::Context;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::User;
use crate::web::templates;

/// One-shot notice carried on a redirect's query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Flash {
  pub message: Option<String>,
  pub error: Option<String>,
}

/// Context every page template expects.
pub fn page_context(config: &AppConfig, user: Option<&User>, flash: &Flash) -> Context {
  let mut context = Context::new();
  context.insert("current_user", &user);
  context.insert("message", &flash.message);
  context.insert("error", &flash.error);
  context.insert("media_url", &config.media_url);
  context
}

pub fn render_page(template: &str, context: &Context) -> Result<HttpResponse> {
  let html = templates::render(template, context)?;
  Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

pub fn redirect(location: &str) -> HttpResponse {
  HttpResponse::SeeOther().insert_header((header::LOCATION, location)).finish()
}

/// Redirects to `location` with `?<key>=<text>` appended.
pub fn redirect_with(location: &str, key: &str, text: &str) -> HttpResponse {
  let query = serde_urlencoded::to_string([(key, text)]).unwrap_or_default();
  let separator = if location.contains('?') { '&' } else { '?' };
  redirect(&format!("{}{}{}", location, separator, query))
}

/// Keeps `next` only when it is a local absolute path.
pub fn safe_next(raw: &str) -> String {
  let raw = raw.trim();
  if raw.starts_with('/') && !raw.starts_with("//") && !raw.contains('\\') && !raw.contains("://") {
    raw.to_string()
  } else {
    "/".to_string()
  }
}

pub fn session_cookie(config: &AppConfig, token: Uuid) -> Cookie<'static> {
  Cookie::build(config.session_cookie_name.clone(), token.to_string())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(config.secure_cookies)
    .max_age(CookieDuration::hours(config.session_ttl_hours))
    .finish()
}

pub fn expired_session_cookie(config: &AppConfig) -> Cookie<'static> {
  let mut cookie = Cookie::build(config.session_cookie_name.clone(), "")
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(config.secure_cookies)
    .finish();
  cookie.make_removal();
  cookie
}
