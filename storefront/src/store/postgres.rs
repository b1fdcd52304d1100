// storefront/src/store/postgres.rs

use super::Store;
use crate::errors::{unique_violation, AppError, Result};
use crate::models::{
  Cart, CartItem, CartLine, Contact, NewContact, NewUser, Product, ProductFilter, ProductInput, ProfileUpdate, Session,
  User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, is_staff, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, is_active, image, created_at, updated_at";
const CART_ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await
      .map_err(|e| {
        error!(error = %e, "Failed to connect to the database.");
        AppError::Sqlx(e)
      })?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  pub async fn run_migrations(&self) -> Result<()> {
    sqlx::migrate!("./migrations")
      .run(&self.pool)
      .await
      .map_err(|e| AppError::Internal(format!("Database migration failed: {}", e)))?;
    info!("Database migrations applied.");
    Ok(())
  }
}

/// `%term%` with LIKE wildcards in `term` escaped.
fn contains_pattern(term: &str) -> String {
  let mut escaped = String::with_capacity(term.len() + 2);
  escaped.push('%');
  for c in term.chars() {
    if matches!(c, '\\' | '%' | '_') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

#[async_trait]
impl Store for PgStore {
  #[instrument(name = "pg_store::create_user", skip(self, new_user), fields(username = %new_user.username), err(Display))]
  async fn create_user(&self, new_user: NewUser) -> Result<User> {
    let mut tx = self.pool.begin().await?;

    let user = sqlx::query_as::<_, User>(&format!(
      "INSERT INTO users (username, email, password_hash, is_staff) VALUES ($1, $2, $3, $4) RETURNING {}",
      USER_COLUMNS
    ))
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(new_user.is_staff)
    .fetch_one(&mut *tx)
    .await
    .map_err(unique_violation("A user with that username or email already exists."))?;

    sqlx::query("INSERT INTO carts (user_id) VALUES ($1)")
      .bind(user.id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    info!(user_id = user.id, "User created with cart.");
    Ok(user)
  }

  async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS))
      .bind(username)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn username_taken(&self, username: &str, except_user: Option<i64>) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
      "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(username)
    .bind(except_user)
    .fetch_one(&self.pool)
    .await?;
    Ok(taken)
  }

  async fn email_taken(&self, email: &str, except_user: Option<i64>) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
      "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(except_user)
    .fetch_one(&self.pool)
    .await?;
    Ok(taken)
  }

  #[instrument(name = "pg_store::update_profile", skip(self, update), err(Display))]
  async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
      "UPDATE users SET username = $2, email = $3, first_name = $4, last_name = $5, updated_at = NOW() \
       WHERE id = $1 RETURNING {}",
      USER_COLUMNS
    ))
    .bind(user_id)
    .bind(&update.username)
    .bind(&update.email)
    .bind(&update.first_name)
    .bind(&update.last_name)
    .fetch_optional(&self.pool)
    .await
    .map_err(unique_violation("A user with that username or email already exists."))?;
    Ok(user)
  }

  async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> Result<()> {
    let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
      .bind(user_id)
      .bind(password_hash)
      .execute(&self.pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::NotFound(format!("User {} not found.", user_id)));
    }
    Ok(())
  }

  async fn create_session(&self, user_id: i64, expires_at: DateTime<Utc>) -> Result<Session> {
    let session = sqlx::query_as::<_, Session>(
      "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3) \
       RETURNING token, user_id, created_at, expires_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(&self.pool)
    .await?;
    Ok(session)
  }

  async fn find_session(&self, token: Uuid) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
      "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(&self.pool)
    .await?;
    Ok(session)
  }

  async fn delete_session(&self, token: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
      .bind(token)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn delete_other_sessions(&self, user_id: i64, keep: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND token <> $2")
      .bind(user_id)
      .bind(keep)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM products WHERE TRUE", PRODUCT_COLUMNS));
    if let Some(active) = filter.is_active {
      qb.push(" AND is_active = ").push_bind(active);
    }
    if let Some(term) = &filter.search {
      qb.push(" AND name ILIKE ").push_bind(contains_pattern(term));
    }
    qb.push(" ORDER BY created_at DESC, id DESC");

    let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
    Ok(products)
  }

  async fn find_product(&self, product_id: i64) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  async fn find_active_products_named(&self, name: &str) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products WHERE is_active AND LOWER(name) = LOWER($1) ORDER BY created_at DESC, id DESC",
      PRODUCT_COLUMNS
    ))
    .bind(name)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  #[instrument(name = "pg_store::create_product", skip(self, input), fields(name = %input.name), err(Display))]
  async fn create_product(&self, input: ProductInput) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (name, description, price, stock, is_active, image) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.stock)
    .bind(input.is_active)
    .bind(&input.image)
    .fetch_one(&self.pool)
    .await?;
    Ok(product)
  }

  #[instrument(name = "pg_store::update_product", skip(self, input), err(Display))]
  async fn update_product(&self, product_id: i64, input: ProductInput) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET name = $2, description = $3, price = $4, stock = $5, is_active = $6, image = $7, \
       updated_at = NOW() WHERE id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.stock)
    .bind(input.is_active)
    .bind(&input.image)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  async fn delete_product(&self, product_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn find_cart(&self, user_id: i64) -> Result<Option<Cart>> {
    let cart = sqlx::query_as::<_, Cart>("SELECT id, user_id, created_at, updated_at FROM carts WHERE user_id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  async fn get_or_create_cart(&self, user_id: i64) -> Result<Cart> {
    // The no-op update makes RETURNING yield the existing row on conflict.
    let cart = sqlx::query_as::<_, Cart>(
      "INSERT INTO carts (user_id) VALUES ($1) \
       ON CONFLICT (user_id) DO UPDATE SET updated_at = carts.updated_at \
       RETURNING id, user_id, created_at, updated_at",
    )
    .bind(user_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(cart)
  }

  async fn cart_lines(&self, cart_id: i64) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
      "SELECT ci.product_id, p.name, p.price, ci.quantity, p.image \
       FROM cart_items ci JOIN products p ON p.id = ci.product_id \
       WHERE ci.cart_id = $1 ORDER BY ci.created_at, ci.id",
    )
    .bind(cart_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }

  async fn upsert_cart_item(&self, cart_id: i64, product_id: i64, quantity: i32) -> Result<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
      "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
       ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW() \
       RETURNING {}",
      CART_ITEM_COLUMNS
    ))
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(&self.pool)
    .await?;

    sqlx::query("UPDATE carts SET updated_at = NOW() WHERE id = $1")
      .bind(cart_id)
      .execute(&self.pool)
      .await?;
    Ok(item)
  }

  async fn remove_cart_item(&self, cart_id: i64, product_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
      .bind(cart_id)
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn clear_cart(&self, cart_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  async fn create_contact(&self, contact: NewContact) -> Result<Contact> {
    let contact = sqlx::query_as::<_, Contact>(
      "INSERT INTO contacts (name, email, message) VALUES ($1, $2, $3) \
       RETURNING id, name, email, message, created_at",
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.message)
    .fetch_one(&self.pool)
    .await?;
    Ok(contact)
  }

  async fn list_contacts(&self) -> Result<Vec<Contact>> {
    let contacts = sqlx::query_as::<_, Contact>(
      "SELECT id, name, email, message, created_at FROM contacts ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(contacts)
  }
}
