// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use actix_web::cookie::Cookie;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::models::{Product, ProductInput, User};
use storefront::services::{account_service, auth_service};
use storefront::state::AppState;
use storefront::store::MemoryStore;
pub use storefront::store::Store;
use storefront::web::responses;
use tempfile::TempDir;
use tracing::Level;

pub const PASSWORD: &str = "s3cret-pass";

// --- Helper for Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// App state over a fresh in-memory store. Keep the struct alive for the
/// whole test; dropping it removes the media directory.
pub struct TestEnv {
  pub state: AppState,
  pub media: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    setup_tracing();
    let media = tempfile::tempdir().expect("create media dir");
    let config = AppConfig {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      database_url: "memory://".to_string(),
      database_max_connections: 1,
      app_base_url: "http://localhost".to_string(),
      media_root: media.path().to_path_buf(),
      media_url: "/media".to_string(),
      max_upload_bytes: 1024 * 1024,
      session_cookie_name: "sessionid".to_string(),
      session_ttl_hours: 1,
      secure_cookies: false,
      seed_db: false,
      admin_account: None,
    };
    let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(config));
    Self { state, media }
  }

  pub fn store(&self) -> &dyn Store {
    self.state.store.as_ref()
  }

  pub async fn user(&self, username: &str) -> User {
    account_service::create_account(self.store(), username, &format!("{}@example.com", username), PASSWORD, false)
      .await
      .expect("create user")
  }

  pub async fn staff(&self, username: &str) -> User {
    account_service::create_account(self.store(), username, &format!("{}@example.com", username), PASSWORD, true)
      .await
      .expect("create staff")
  }

  /// Starts a session for `user` and returns the cookie a browser would send.
  pub async fn login_cookie(&self, user: &User) -> Cookie<'static> {
    let session = auth_service::start_session(self.store(), user.id, 1).await.expect("start session");
    responses::session_cookie(&self.state.config, session.token)
  }

  pub async fn product(&self, name: &str, cents: i64, active: bool) -> Product {
    self
      .store()
      .create_product(ProductInput {
        name: name.to_string(),
        description: format!("{} description", name),
        price: Decimal::new(cents, 2),
        stock: 10,
        is_active: active,
        image: None,
      })
      .await
      .expect("create product")
  }
}

/// Builds the routed service over `$env.state`, as `main` does minus logging and media.
#[allow(unused_macros)]
macro_rules! test_app {
  ($env:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($env.state.clone()))
        .app_data(
          actix_multipart::form::MultipartFormConfig::default().total_limit($env.state.config.max_upload_bytes),
        )
        .configure(storefront::web::configure_app_routes),
    )
    .await
  };
}

pub fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
  resp
    .headers()
    .get(actix_web::http::header::LOCATION)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_string()
}
