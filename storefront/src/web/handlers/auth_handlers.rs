// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::forms::{FormErrors, LoginForm, RegisterForm};
use crate::services::{account_service, auth_service};
use crate::state::AppState;
use crate::web::extractors::MaybeUser;
use crate::web::responses::{
  expired_session_cookie, page_context, redirect, redirect_with, render_page, safe_next, session_cookie, Flash,
};

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
  #[serde(default)]
  pub next: String,
}

fn login_page(app_state: &AppState, flash: &Flash, form: &LoginForm, errors: &FormErrors) -> Result<HttpResponse, AppError> {
  let mut context = page_context(&app_state.config, None, flash);
  context.insert("form", form);
  context.insert("errors", errors);
  render_page("login.html", &context)
}

pub async fn login_form(
  app_state: web::Data<AppState>,
  user: MaybeUser,
  query: web::Query<NextQuery>,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  if user.user().is_some() {
    return Ok(redirect(&safe_next(&query.next)));
  }
  let form = LoginForm { next: safe_next(&query.next), ..LoginForm::default() };
  login_page(&app_state, &flash, &form, &FormErrors::new())
}

#[instrument(name = "handler::login", skip(app_state, form), fields(username = %form.username))]
pub async fn login_submit(
  app_state: web::Data<AppState>,
  form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  let (username, password) = match form.clean() {
    Ok(credentials) => credentials,
    Err(errors) => return login_page(&app_state, &Flash::default(), &form, &errors),
  };

  let Some(user) = auth_service::authenticate(app_state.store.as_ref(), &username, &password).await? else {
    let mut errors = FormErrors::new();
    errors.add_non_field(
      "Please enter a correct username and password. Note that both fields may be case-sensitive.",
    );
    return login_page(&app_state, &Flash::default(), &form, &errors);
  };

  let session = auth_service::start_session(app_state.store.as_ref(), user.id, app_state.config.session_ttl_hours).await?;
  info!(user_id = user.id, "User logged in.");

  let mut response = redirect(&safe_next(&form.next));
  response
    .add_cookie(&session_cookie(&app_state.config, session.token))
    .map_err(|e| AppError::Internal(format!("Failed to set session cookie: {}", e)))?;
  Ok(response)
}

/// Accepts GET and POST; both end the current session.
#[instrument(name = "handler::logout", skip_all)]
pub async fn logout(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
  if let Some(cookie) = req.cookie(&app_state.config.session_cookie_name) {
    match uuid::Uuid::parse_str(cookie.value()) {
      Ok(token) => {
        app_state.store.delete_session(token).await?;
        info!("User logged out.");
      }
      Err(_) => warn!("Ignoring malformed session cookie on logout."),
    }
  }
  let mut response = redirect("/");
  response
    .add_cookie(&expired_session_cookie(&app_state.config))
    .map_err(|e| AppError::Internal(format!("Failed to clear session cookie: {}", e)))?;
  Ok(response)
}

fn register_page(
  app_state: &AppState,
  flash: &Flash,
  form: &RegisterForm,
  errors: &FormErrors,
) -> Result<HttpResponse, AppError> {
  let mut context = page_context(&app_state.config, None, flash);
  context.insert("form", form);
  context.insert("errors", errors);
  render_page("register.html", &context)
}

pub async fn register_form(
  app_state: web::Data<AppState>,
  user: MaybeUser,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  if user.user().is_some() {
    return Ok(redirect("/"));
  }
  register_page(&app_state, &flash, &RegisterForm::default(), &FormErrors::new())
}

#[instrument(name = "handler::register", skip(app_state, form), fields(username = %form.username))]
pub async fn register_submit(
  app_state: web::Data<AppState>,
  form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  match account_service::register(app_state.store.as_ref(), &form).await? {
    Ok(user) => {
      info!(user_id = user.id, "Registration complete.");
      Ok(redirect_with("/login/", "message", "Account created successfully. You can now log in."))
    }
    Err(errors) => register_page(&app_state, &Flash::default(), &form, &errors),
  }
}
