// storefront/src/store/memory.rs

use super::Store;
use crate::errors::{AppError, Result};
use crate::models::{
  Cart, CartItem, CartLine, Contact, NewContact, NewUser, Product, ProductFilter, ProductInput, ProfileUpdate, Session,
  User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// In-process backend used for `DATABASE_URL=memory://` and by the test suite.
///
/// Mirrors the constraints of the SQL schema: unique usernames and
/// (case-insensitive) emails, one cart per user, one item per (cart, product),
/// and cascading deletes from products, users and carts.
#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
  next_id: i64,
  users: Vec<User>,
  sessions: HashMap<Uuid, Session>,
  products: Vec<Product>,
  carts: Vec<Cart>,
  cart_items: Vec<CartItem>,
  contacts: Vec<Contact>,
}

impl Tables {
  fn next_id(&mut self) -> i64 {
    self.next_id += 1;
    self.next_id
  }

  fn user_conflicts(&self, username: &str, email: &str, except_user: Option<i64>) -> bool {
    self.users.iter().any(|u| {
      Some(u.id) != except_user && (u.username == username || u.email.eq_ignore_ascii_case(email))
    })
  }

  fn insert_cart(&mut self, user_id: i64) -> Cart {
    let now = Utc::now();
    let cart = Cart { id: self.next_id(), user_id, created_at: now, updated_at: now };
    self.carts.push(cart.clone());
    cart
  }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
  rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn create_user(&self, new_user: NewUser) -> Result<User> {
    let mut tables = self.tables.write();
    if tables.user_conflicts(&new_user.username, &new_user.email, None) {
      return Err(AppError::Validation("A user with that username or email already exists.".to_string()));
    }
    let now = Utc::now();
    let user = User {
      id: tables.next_id(),
      username: new_user.username,
      email: new_user.email,
      password_hash: new_user.password_hash,
      first_name: String::new(),
      last_name: String::new(),
      is_staff: new_user.is_staff,
      created_at: now,
      updated_at: now,
    };
    tables.users.push(user.clone());
    tables.insert_cart(user.id);
    Ok(user)
  }

  async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
    Ok(self.tables.read().users.iter().find(|u| u.id == user_id).cloned())
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    Ok(self.tables.read().users.iter().find(|u| u.username == username).cloned())
  }

  async fn username_taken(&self, username: &str, except_user: Option<i64>) -> Result<bool> {
    let tables = self.tables.read();
    Ok(tables.users.iter().any(|u| Some(u.id) != except_user && u.username.eq_ignore_ascii_case(username)))
  }

  async fn email_taken(&self, email: &str, except_user: Option<i64>) -> Result<bool> {
    let tables = self.tables.read();
    Ok(tables.users.iter().any(|u| Some(u.id) != except_user && u.email.eq_ignore_ascii_case(email)))
  }

  async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<Option<User>> {
    let mut tables = self.tables.write();
    if tables.user_conflicts(&update.username, &update.email, Some(user_id)) {
      return Err(AppError::Validation("A user with that username or email already exists.".to_string()));
    }
    let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) else {
      return Ok(None);
    };
    user.username = update.username;
    user.email = update.email;
    user.first_name = update.first_name;
    user.last_name = update.last_name;
    user.updated_at = Utc::now();
    Ok(Some(user.clone()))
  }

  async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> Result<()> {
    let mut tables = self.tables.write();
    let user = tables
      .users
      .iter_mut()
      .find(|u| u.id == user_id)
      .ok_or_else(|| AppError::NotFound(format!("User {} not found.", user_id)))?;
    user.password_hash = password_hash.to_string();
    user.updated_at = Utc::now();
    Ok(())
  }

  async fn create_session(&self, user_id: i64, expires_at: DateTime<Utc>) -> Result<Session> {
    let mut tables = self.tables.write();
    if !tables.users.iter().any(|u| u.id == user_id) {
      return Err(AppError::NotFound(format!("User {} not found.", user_id)));
    }
    let session = Session { token: Uuid::new_v4(), user_id, created_at: Utc::now(), expires_at };
    tables.sessions.insert(session.token, session.clone());
    Ok(session)
  }

  async fn find_session(&self, token: Uuid) -> Result<Option<Session>> {
    Ok(self.tables.read().sessions.get(&token).cloned())
  }

  async fn delete_session(&self, token: Uuid) -> Result<()> {
    self.tables.write().sessions.remove(&token);
    Ok(())
  }

  async fn delete_other_sessions(&self, user_id: i64, keep: Uuid) -> Result<u64> {
    let mut tables = self.tables.write();
    let before = tables.sessions.len();
    tables.sessions.retain(|token, s| s.user_id != user_id || *token == keep);
    Ok((before - tables.sessions.len()) as u64)
  }

  async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
    let mut products: Vec<Product> =
      self.tables.read().products.iter().filter(|p| filter.matches(p)).cloned().collect();
    newest_first(&mut products, |p| (p.created_at, p.id));
    Ok(products)
  }

  async fn find_product(&self, product_id: i64) -> Result<Option<Product>> {
    Ok(self.tables.read().products.iter().find(|p| p.id == product_id).cloned())
  }

  async fn find_active_products_named(&self, name: &str) -> Result<Vec<Product>> {
    let needle = name.to_lowercase();
    let mut products: Vec<Product> = self
      .tables
      .read()
      .products
      .iter()
      .filter(|p| p.is_active && p.name.to_lowercase() == needle)
      .cloned()
      .collect();
    newest_first(&mut products, |p| (p.created_at, p.id));
    Ok(products)
  }

  async fn create_product(&self, input: ProductInput) -> Result<Product> {
    let mut tables = self.tables.write();
    let now = Utc::now();
    let product = Product {
      id: tables.next_id(),
      name: input.name,
      description: input.description,
      price: input.price,
      stock: input.stock,
      is_active: input.is_active,
      image: input.image,
      created_at: now,
      updated_at: now,
    };
    tables.products.push(product.clone());
    Ok(product)
  }

  async fn update_product(&self, product_id: i64, input: ProductInput) -> Result<Option<Product>> {
    let mut tables = self.tables.write();
    let Some(product) = tables.products.iter_mut().find(|p| p.id == product_id) else {
      return Ok(None);
    };
    product.name = input.name;
    product.description = input.description;
    product.price = input.price;
    product.stock = input.stock;
    product.is_active = input.is_active;
    product.image = input.image;
    product.updated_at = Utc::now();
    Ok(Some(product.clone()))
  }

  async fn delete_product(&self, product_id: i64) -> Result<bool> {
    let mut tables = self.tables.write();
    let before = tables.products.len();
    tables.products.retain(|p| p.id != product_id);
    let deleted = tables.products.len() != before;
    if deleted {
      tables.cart_items.retain(|i| i.product_id != product_id);
    }
    Ok(deleted)
  }

  async fn find_cart(&self, user_id: i64) -> Result<Option<Cart>> {
    Ok(self.tables.read().carts.iter().find(|c| c.user_id == user_id).cloned())
  }

  async fn get_or_create_cart(&self, user_id: i64) -> Result<Cart> {
    let mut tables = self.tables.write();
    if let Some(cart) = tables.carts.iter().find(|c| c.user_id == user_id) {
      return Ok(cart.clone());
    }
    if !tables.users.iter().any(|u| u.id == user_id) {
      return Err(AppError::NotFound(format!("User {} not found.", user_id)));
    }
    Ok(tables.insert_cart(user_id))
  }

  async fn cart_lines(&self, cart_id: i64) -> Result<Vec<CartLine>> {
    let tables = self.tables.read();
    let lines = tables
      .cart_items
      .iter()
      .filter(|i| i.cart_id == cart_id)
      .filter_map(|item| {
        tables.products.iter().find(|p| p.id == item.product_id).map(|product| CartLine {
          product_id: product.id,
          name: product.name.clone(),
          price: product.price,
          quantity: item.quantity,
          image: product.image.clone(),
        })
      })
      .collect();
    Ok(lines)
  }

  async fn upsert_cart_item(&self, cart_id: i64, product_id: i64, quantity: i32) -> Result<CartItem> {
    let mut tables = self.tables.write();
    if !tables.products.iter().any(|p| p.id == product_id) {
      return Err(AppError::NotFound(format!("Product {} not found.", product_id)));
    }
    let now = Utc::now();
    if let Some(cart) = tables.carts.iter_mut().find(|c| c.id == cart_id) {
      cart.updated_at = now;
    } else {
      return Err(AppError::NotFound(format!("Cart {} not found.", cart_id)));
    }

    if let Some(item) = tables.cart_items.iter_mut().find(|i| i.cart_id == cart_id && i.product_id == product_id) {
      item.quantity = quantity;
      item.updated_at = now;
      return Ok(item.clone());
    }
    let item = CartItem { id: tables.next_id(), cart_id, product_id, quantity, created_at: now, updated_at: now };
    tables.cart_items.push(item.clone());
    Ok(item)
  }

  async fn remove_cart_item(&self, cart_id: i64, product_id: i64) -> Result<bool> {
    let mut tables = self.tables.write();
    let before = tables.cart_items.len();
    tables.cart_items.retain(|i| !(i.cart_id == cart_id && i.product_id == product_id));
    Ok(tables.cart_items.len() != before)
  }

  async fn clear_cart(&self, cart_id: i64) -> Result<u64> {
    let mut tables = self.tables.write();
    let before = tables.cart_items.len();
    tables.cart_items.retain(|i| i.cart_id != cart_id);
    Ok((before - tables.cart_items.len()) as u64)
  }

  async fn create_contact(&self, contact: NewContact) -> Result<Contact> {
    let mut tables = self.tables.write();
    let contact = Contact {
      id: tables.next_id(),
      name: contact.name,
      email: contact.email,
      message: contact.message,
      created_at: Utc::now(),
    };
    tables.contacts.push(contact.clone());
    Ok(contact)
  }

  async fn list_contacts(&self) -> Result<Vec<Contact>> {
    let mut contacts = self.tables.read().contacts.clone();
    newest_first(&mut contacts, |c| (c.created_at, c.id));
    Ok(contacts)
  }
}
