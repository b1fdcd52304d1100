// storefront/src/main.rs

use std::io;
use std::sync::Arc;

use actix_multipart::form::MultipartFormConfig;
use actix_web::{web, App, HttpServer};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

use storefront::config::AppConfig;
use storefront::state::AppState;
use storefront::web::configure_app_routes;
use storefront::{seed, store};

fn to_io(e: storefront::AppError) -> io::Error {
  io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  // Initialize tracing subscriber for logging (RUST_LOG overrides the default level)
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(to_io(e));
    }
  };

  let store = match store::connect(&app_config).await {
    Ok(store) => store,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize the store.");
      return Err(to_io(e));
    }
  };

  tokio::fs::create_dir_all(&app_config.media_root).await?;

  let app_state = AppState::new(store, app_config.clone());

  if app_config.seed_db {
    if let Err(e) = seed::seed_db(&app_state).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!(base_url = %app_config.app_base_url, "Attempting to bind server to {}...", server_address);

  let state = web::Data::new(app_state);
  HttpServer::new(move || {
    App::new()
      .app_data(state.clone())
      .app_data(MultipartFormConfig::default().total_limit(app_config.max_upload_bytes))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
      .service(actix_files::Files::new(&app_config.media_url, &app_config.media_root))
  })
  .bind(&server_address)?
  .run()
  .await
}
