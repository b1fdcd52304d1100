// storefront/src/services/account_service.rs

//! Registration, profile edits and password changes.
//!
//! Each operation returns `Ok(Err(FormErrors))` when the submitted form is
//! invalid so the handler can re-render it, and `Err(AppError)` only for
//! failures the visitor cannot fix.

use crate::errors::{AppError, Result};
use crate::forms::{FormErrors, PasswordChangeForm, ProfileForm, RegisterForm};
use crate::models::{NewUser, User};
use crate::services::auth_service;
use crate::store::Store;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub type FormOutcome<T> = Result<std::result::Result<T, FormErrors>>;

#[instrument(name = "account_service::register", skip(store, form), fields(username = %form.username))]
pub async fn register(store: &dyn Store, form: &RegisterForm) -> FormOutcome<User> {
  let registration = match form.clean() {
    Ok(r) => r,
    Err(errors) => return Ok(Err(errors)),
  };

  let mut errors = FormErrors::new();
  if store.username_taken(&registration.username, None).await? {
    errors.add("username", "A user with that username already exists.");
  }
  if store.email_taken(&registration.email, None).await? {
    errors.add("email", "A user with that email already exists.");
  }
  if !errors.is_empty() {
    warn!("Registration rejected: username or email in use.");
    return Ok(Err(errors));
  }

  let password_hash = auth_service::hash_password(&registration.password)?;
  let created = store
    .create_user(NewUser {
      username: registration.username,
      email: registration.email,
      password_hash,
      is_staff: false,
    })
    .await;

  match created {
    Ok(user) => {
      info!(user_id = user.id, "User registered.");
      Ok(Ok(user))
    }
    // Lost a race with a concurrent registration for the same name/email.
    Err(AppError::Validation(message)) => {
      let mut errors = FormErrors::new();
      errors.add_non_field(message);
      Ok(Err(errors))
    }
    Err(e) => Err(e),
  }
}

/// Creates a user straight from trusted input, as the seeder does.
pub async fn create_account(store: &dyn Store, username: &str, email: &str, password: &str, is_staff: bool) -> Result<User> {
  let password_hash = auth_service::hash_password(password)?;
  store
    .create_user(NewUser {
      username: username.to_string(),
      email: email.to_string(),
      password_hash,
      is_staff,
    })
    .await
}

#[instrument(name = "account_service::update_profile", skip(store, user, form), fields(user_id = user.id))]
pub async fn update_profile(store: &dyn Store, user: &User, form: &ProfileForm) -> FormOutcome<User> {
  let update = match form.clean() {
    Ok(u) => u,
    Err(errors) => return Ok(Err(errors)),
  };

  let mut errors = FormErrors::new();
  if store.username_taken(&update.username, Some(user.id)).await? {
    errors.add("username", "A user with that username already exists.");
  }
  if store.email_taken(&update.email, Some(user.id)).await? {
    errors.add("email", "A user with that email already exists.");
  }
  if !errors.is_empty() {
    return Ok(Err(errors));
  }

  match store.update_profile(user.id, update).await {
    Ok(Some(updated)) => {
      info!("Profile updated.");
      Ok(Ok(updated))
    }
    Ok(None) => Err(AppError::NotFound(format!("User {} not found.", user.id))),
    Err(AppError::Validation(message)) => {
      let mut errors = FormErrors::new();
      errors.add_non_field(message);
      Ok(Err(errors))
    }
    Err(e) => Err(e),
  }
}

/// Changes the password and revokes every other session of the user.
#[instrument(name = "account_service::change_password", skip(store, user, form), fields(user_id = user.id))]
pub async fn change_password(
  store: &dyn Store,
  user: &User,
  current_session: Uuid,
  form: &PasswordChangeForm,
) -> FormOutcome<()> {
  let new_password = match form.clean() {
    Ok(p) => p,
    Err(errors) => return Ok(Err(errors)),
  };
  if !auth_service::verify_password(&user.password_hash, &form.old_password)? {
    let mut errors = FormErrors::new();
    errors.add("old_password", "Your old password was entered incorrectly. Please enter it again.");
    return Ok(Err(errors));
  }

  let password_hash = auth_service::hash_password(&new_password)?;
  store.set_password_hash(user.id, &password_hash).await?;
  let revoked = store.delete_other_sessions(user.id, current_session).await?;
  info!(revoked, "Password changed.");
  Ok(Ok(()))
}
