// storefront/src/web/handlers/profile_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::forms::{FormErrors, PasswordChangeForm, ProfileForm};
use crate::models::User;
use crate::services::{account_service, cart_service};
use crate::state::AppState;
use crate::web::extractors::PageUser;
use crate::web::responses::{page_context, redirect_with, render_page, Flash};

async fn profile_page(
  app_state: &AppState,
  user: &User,
  flash: &Flash,
  form: &ProfileForm,
  errors: &FormErrors,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::get_cart(app_state.store.as_ref(), &app_state.config, user.id).await?;
  let mut context = page_context(&app_state.config, Some(user), flash);
  context.insert("form", form);
  context.insert("errors", errors);
  context.insert("joined", &user.created_at.format("%B %-d, %Y").to_string());
  context.insert("cart_count", &cart.item_count());
  render_page("profile.html", &context)
}

pub async fn profile_form(
  app_state: web::Data<AppState>,
  page_user: PageUser,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  let user = &page_user.user;
  let form = ProfileForm {
    username: user.username.clone(),
    email: user.email.clone(),
    first_name: user.first_name.clone(),
    last_name: user.last_name.clone(),
  };
  profile_page(&app_state, user, &flash, &form, &FormErrors::new()).await
}

#[instrument(name = "handler::profile_update", skip_all, fields(user_id = page_user.user.id))]
pub async fn profile_submit(
  app_state: web::Data<AppState>,
  page_user: PageUser,
  form: web::Form<ProfileForm>,
) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  match account_service::update_profile(app_state.store.as_ref(), &page_user.user, &form).await? {
    Ok(_) => Ok(redirect_with("/profile/", "message", "Profile updated.")),
    Err(errors) => profile_page(&app_state, &page_user.user, &Flash::default(), &form, &errors).await,
  }
}

fn password_page(app_state: &AppState, user: &User, flash: &Flash, errors: &FormErrors) -> Result<HttpResponse, AppError> {
  let mut context = page_context(&app_state.config, Some(user), flash);
  context.insert("errors", errors);
  render_page("password_change.html", &context)
}

pub async fn password_form(
  app_state: web::Data<AppState>,
  page_user: PageUser,
  flash: web::Query<Flash>,
) -> Result<HttpResponse, AppError> {
  password_page(&app_state, &page_user.user, &flash, &FormErrors::new())
}

#[instrument(name = "handler::password_change", skip_all, fields(user_id = page_user.user.id))]
pub async fn password_submit(
  app_state: web::Data<AppState>,
  page_user: PageUser,
  form: web::Form<PasswordChangeForm>,
) -> Result<HttpResponse, AppError> {
  let outcome = account_service::change_password(
    app_state.store.as_ref(),
    &page_user.user,
    page_user.session.token,
    &form,
  )
  .await?;
  match outcome {
    Ok(()) => Ok(redirect_with("/profile/", "message", "Your password was changed.")),
    Err(errors) => password_page(&app_state, &page_user.user, &Flash::default(), &errors),
  }
}
