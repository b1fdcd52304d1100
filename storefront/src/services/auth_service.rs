// storefront/src/services/auth_service.rs

//! Password hashing and cookie sessions.

use crate::errors::{AppError, Result};
use crate::models::{Session, User};
use crate::store::Store;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Hashes a plain-text password with Argon2 and a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      error!(error = %e, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", e))
    })
}

/// Returns `Ok(false)` on a mismatch; a malformed stored hash is an internal error.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<bool> {
  if candidate.is_empty() {
    return Ok(false);
  }
  let parsed = PasswordHash::new(stored_hash).map_err(|e| {
    error!(error = %e, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", e))
  })?;
  match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => Err(AppError::Internal(format!("Password verification process failed: {}", e))),
  }
}

/// Looks the user up by username and checks the password. `None` covers both
/// an unknown username and a wrong password.
#[instrument(name = "auth_service::authenticate", skip(store, password), fields(username = %username))]
pub async fn authenticate(store: &dyn Store, username: &str, password: &str) -> Result<Option<User>> {
  let Some(user) = store.find_user_by_username(username).await? else {
    debug!("Unknown username.");
    return Ok(None);
  };
  if verify_password(&user.password_hash, password)? {
    info!(user_id = user.id, "User authenticated.");
    Ok(Some(user))
  } else {
    warn!(user_id = user.id, "Password mismatch.");
    Ok(None)
  }
}

pub async fn start_session(store: &dyn Store, user_id: i64, ttl_hours: i64) -> Result<Session> {
  let expires_at = Utc::now() + Duration::hours(ttl_hours);
  let session = store.create_session(user_id, expires_at).await?;
  debug!(user_id, "Session started.");
  Ok(session)
}

/// Resolves a cookie value to its user. Unknown, malformed and expired
/// tokens all resolve to `None`; expired rows are deleted on sight.
pub async fn resolve_session(store: &dyn Store, raw_token: &str) -> Result<Option<(Session, User)>> {
  let Ok(token) = Uuid::parse_str(raw_token) else {
    return Ok(None);
  };
  let Some(session) = store.find_session(token).await? else {
    return Ok(None);
  };
  if session.is_expired_at(Utc::now()) {
    debug!(user_id = session.user_id, "Session expired.");
    store.delete_session(token).await?;
    return Ok(None);
  }
  Ok(store.find_user(session.user_id).await?.map(|user| (session, user)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::NewUser;
  use crate::store::MemoryStore;

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("correct horse").unwrap();
    assert_ne!(hash, "correct horse");
    assert!(verify_password(&hash, "correct horse").unwrap());
    assert!(!verify_password(&hash, "battery staple").unwrap());
    assert!(!verify_password(&hash, "").unwrap());
  }

  #[test]
  fn empty_password_is_not_hashed() {
    assert!(matches!(hash_password(""), Err(AppError::Validation(_))));
  }

  #[tokio::test]
  async fn expired_sessions_do_not_resolve() {
    let store = MemoryStore::new();
    let user = store
      .create_user(NewUser {
        username: "ana".to_string(),
        email: "ana@example.com".to_string(),
        password_hash: hash_password("password123").unwrap(),
        is_staff: false,
      })
      .await
      .unwrap();

    let live = start_session(&store, user.id, 1).await.unwrap();
    let resolved = resolve_session(&store, &live.token.to_string()).await.unwrap();
    assert_eq!(resolved.map(|(_, u)| u.id), Some(user.id));

    let stale = store.create_session(user.id, Utc::now() - Duration::minutes(1)).await.unwrap();
    assert!(resolve_session(&store, &stale.token.to_string()).await.unwrap().is_none());
    assert!(store.find_session(stale.token).await.unwrap().is_none());

    assert!(resolve_session(&store, "not-a-uuid").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn authenticate_rejects_wrong_password() {
    let store = MemoryStore::new();
    store
      .create_user(NewUser {
        username: "ana".to_string(),
        email: "ana@example.com".to_string(),
        password_hash: hash_password("password123").unwrap(),
        is_staff: false,
      })
      .await
      .unwrap();

    assert!(authenticate(&store, "ana", "password123").await.unwrap().is_some());
    assert!(authenticate(&store, "ana", "nope").await.unwrap().is_none());
    assert!(authenticate(&store, "bob", "password123").await.unwrap().is_none());
  }
}
