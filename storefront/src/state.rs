// storefront/src/state.rs
use crate::config::AppConfig;
use crate::realtime::RoomHub;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub config: Arc<AppConfig>,
  pub rooms: Arc<RoomHub>,
}

impl AppState {
  pub fn new(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
    Self { store, config, rooms: Arc::new(RoomHub::new()) }
  }
}
