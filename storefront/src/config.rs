// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `postgres://...` selects PostgreSQL, `memory://` the in-process store.
  pub database_url: String,
  pub database_max_connections: u32,
  pub app_base_url: String,

  pub media_root: PathBuf,
  pub media_url: String,
  pub max_upload_bytes: usize,

  pub session_cookie_name: String,
  pub session_ttl_hours: i64,
  pub secure_cookies: bool,

  pub seed_db: bool,
  pub admin_account: Option<AdminAccount>,
}

/// Staff account created by the seeder.
#[derive(Debug, Clone)]
pub struct AdminAccount {
  pub username: String,
  pub email: String,
  pub password: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };
    let env_or = |var_name: &str, default: &str| get_env(var_name).unwrap_or_else(|_| default.to_string());

    let server_host = env_or("SERVER_HOST", "127.0.0.1");
    let server_port = env_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let database_max_connections = env_or("DATABASE_MAX_CONNECTIONS", "10")
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let media_root = PathBuf::from(env_or("MEDIA_ROOT", "./media"));
    let media_url = normalize_media_url(&env_or("MEDIA_URL", "/media"))?;
    let max_upload_bytes = env_or("MAX_UPLOAD_BYTES", "5242880")
      .parse::<usize>()
      .map_err(|e| AppError::Config(format!("Invalid MAX_UPLOAD_BYTES: {}", e)))?;

    let session_cookie_name = env_or("SESSION_COOKIE_NAME", "sessionid");
    let session_ttl_hours = env_or("SESSION_TTL_HOURS", "336")
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_TTL_HOURS: {}", e)))?;
    if session_ttl_hours <= 0 {
      return Err(AppError::Config("SESSION_TTL_HOURS must be positive".to_string()));
    }
    let secure_cookies = env_or("SECURE_COOKIES", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SECURE_COOKIES value: {}", e)))?;

    let seed_db = env_or("SEED_DB", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    let admin_account = match (get_env("ADMIN_USERNAME"), get_env("ADMIN_PASSWORD")) {
      (Ok(username), Ok(password)) => {
        let email = get_env("ADMIN_EMAIL").unwrap_or_else(|_| format!("{}@localhost", username));
        Some(AdminAccount { username, email, password })
      }
      _ => None,
    };

    tracing::info!(
      host = %server_host,
      port = server_port,
      media_root = %media_root.display(),
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      app_base_url,
      media_root,
      media_url,
      max_upload_bytes,
      session_cookie_name,
      session_ttl_hours,
      secure_cookies,
      seed_db,
      admin_account,
    })
  }

  /// Public URL of a stored media file, e.g. `products/ab12.png` -> `/media/products/ab12.png`.
  pub fn media_file_url(&self, relative_path: &str) -> String {
    format!("{}/{}", self.media_url, relative_path.trim_start_matches('/'))
  }
}

fn normalize_media_url(raw: &str) -> Result<String> {
  let trimmed = raw.trim().trim_end_matches('/');
  if !trimmed.starts_with('/') || trimmed.len() < 2 {
    return Err(AppError::Config(format!(
      "MEDIA_URL must be an absolute path such as /media, got '{}'",
      raw
    )));
  }
  Ok(trimmed.to_string())
}
