// storefront/src/seed.rs

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::errors::Result;
use crate::models::{ProductFilter, ProductInput};
use crate::services::account_service;
use crate::state::AppState;

/// (name, description, price in cents, stock)
const DEMO_PRODUCTS: &[(&str, &str, i64, i32)] = &[
  ("Classic Tee", "Soft cotton t-shirt in a relaxed fit.", 1999, 40),
  ("Canvas Tote", "Heavy canvas bag with an inner pocket.", 2450, 25),
  ("Ceramic Mug", "Stoneware mug, 350 ml, dishwasher safe.", 1200, 60),
  ("Wool Beanie", "Ribbed merino beanie.", 1800, 15),
  ("Notebook", "A5 dotted notebook, 120 pages.", 850, 100),
];

/// Inserts demo products into an empty catalog and creates the configured
/// staff account if it does not exist yet. Safe to run on every start.
#[instrument(name = "seed_db", skip_all)]
pub async fn seed_db(state: &AppState) -> Result<()> {
  let store = state.store.as_ref();

  if store.list_products(&ProductFilter::default()).await?.is_empty() {
    for (name, description, cents, stock) in DEMO_PRODUCTS {
      store
        .create_product(ProductInput {
          name: name.to_string(),
          description: description.to_string(),
          price: Decimal::new(*cents, 2),
          stock: *stock,
          is_active: true,
          image: None,
        })
        .await?;
    }
    info!(count = DEMO_PRODUCTS.len(), "Seeded demo products.");
  } else {
    info!("Catalog already has products; skipping product seed.");
  }

  if let Some(admin) = &state.config.admin_account {
    if store.find_user_by_username(&admin.username).await?.is_none() {
      let user = account_service::create_account(store, &admin.username, &admin.email, &admin.password, true).await?;
      info!(user_id = user.id, username = %user.username, "Created staff account.");
    }
  }
  Ok(())
}
