// storefront/src/forms.rs

//! Form payloads and their field validation.
//!
//! Every form deserializes leniently (missing fields become empty strings)
//! and is then cleaned into a typed value or a [`FormErrors`] map that the
//! templates render next to each field. Checks that need the store, such as
//! username/email uniqueness, live in the services.

use crate::models::{NewContact, ProductInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;
pub const MAX_CONTACT_NAME_LENGTH: usize = 100;
const NON_FIELD: &str = "__all__";

/// Field name -> messages. `__all__` holds errors not tied to one field.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_string()).or_default().push(message.into());
  }

  pub fn add_non_field(&mut self, message: impl Into<String>) {
    self.add(NON_FIELD, message);
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn has(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
  }

  fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
    if self.is_empty() {
      Ok(value())
    } else {
      Err(self)
    }
  }
}

fn looks_like_email(value: &str) -> bool {
  let Some((local, domain)) = value.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.is_empty()
    && !domain.starts_with('.')
    && !domain.ends_with('.')
    && domain.contains('.')
    && !value.chars().any(char::is_whitespace)
}

fn check_username(errors: &mut FormErrors, username: &str) {
  if username.is_empty() {
    errors.add("username", "This field is required.");
  } else if username.chars().count() > MAX_USERNAME_LENGTH {
    errors.add("username", format!("Ensure this value has at most {} characters.", MAX_USERNAME_LENGTH));
  } else if !username.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c)) {
    errors.add(
      "username",
      "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
    );
  }
}

fn check_email(errors: &mut FormErrors, email: &str) {
  if email.is_empty() {
    errors.add("email", "This field is required.");
  } else if !looks_like_email(email) {
    errors.add("email", "Enter a valid email address.");
  }
}

fn check_new_password(errors: &mut FormErrors, field: &str, confirm_field: &str, password: &str, confirmation: &str) {
  if password.is_empty() {
    errors.add(field, "This field is required.");
    return;
  }
  if password.chars().count() < MIN_PASSWORD_LENGTH {
    errors.add(
      field,
      format!("This password is too short. It must contain at least {} characters.", MIN_PASSWORD_LENGTH),
    );
  }
  if password.chars().all(|c| c.is_ascii_digit()) {
    errors.add(field, "This password is entirely numeric.");
  }
  if password != confirmation {
    errors.add(confirm_field, "The two password fields didn't match.");
  }
}

// --- Registration ---

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegisterForm {
  pub username: String,
  pub email: String,
  #[serde(skip_serializing)]
  pub password1: String,
  #[serde(skip_serializing)]
  pub password2: String,
}

#[derive(Debug, Clone)]
pub struct Registration {
  pub username: String,
  pub email: String,
  pub password: String,
}

impl RegisterForm {
  pub fn clean(&self) -> Result<Registration, FormErrors> {
    let mut errors = FormErrors::new();
    let username = self.username.trim();
    let email = self.email.trim();
    check_username(&mut errors, username);
    check_email(&mut errors, email);
    if !self.password1.is_empty() && self.password1.eq_ignore_ascii_case(username) {
      errors.add("password2", "The password is too similar to the username.");
    }
    check_new_password(&mut errors, "password1", "password2", &self.password1, &self.password2);
    errors.into_result(|| Registration {
      username: username.to_string(),
      email: email.to_string(),
      password: self.password1.clone(),
    })
  }
}

// --- Login ---

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
  pub username: String,
  #[serde(skip_serializing)]
  pub password: String,
  /// Where to go after a successful login.
  pub next: String,
}

impl LoginForm {
  pub fn clean(&self) -> Result<(String, String), FormErrors> {
    let mut errors = FormErrors::new();
    let username = self.username.trim();
    if username.is_empty() {
      errors.add("username", "This field is required.");
    }
    if self.password.is_empty() {
      errors.add("password", "This field is required.");
    }
    errors.into_result(|| (username.to_string(), self.password.clone()))
  }
}

// --- Profile ---

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileForm {
  pub username: String,
  pub email: String,
  pub first_name: String,
  pub last_name: String,
}

impl ProfileForm {
  pub fn clean(&self) -> Result<crate::models::ProfileUpdate, FormErrors> {
    let mut errors = FormErrors::new();
    let username = self.username.trim();
    let email = self.email.trim();
    check_username(&mut errors, username);
    check_email(&mut errors, email);
    for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
      if value.trim().chars().count() > 150 {
        errors.add(field, "Ensure this value has at most 150 characters.");
      }
    }
    errors.into_result(|| crate::models::ProfileUpdate {
      username: username.to_string(),
      email: email.to_string(),
      first_name: self.first_name.trim().to_string(),
      last_name: self.last_name.trim().to_string(),
    })
  }
}

// --- Password change ---

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
  pub old_password: String,
  pub new_password1: String,
  pub new_password2: String,
}

impl PasswordChangeForm {
  /// Checks everything except the old password, which needs the stored hash.
  pub fn clean(&self) -> Result<String, FormErrors> {
    let mut errors = FormErrors::new();
    if self.old_password.is_empty() {
      errors.add("old_password", "This field is required.");
    }
    check_new_password(&mut errors, "new_password1", "new_password2", &self.new_password1, &self.new_password2);
    errors.into_result(|| self.new_password1.clone())
  }
}

// --- Contact ---

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactForm {
  pub name: String,
  pub email: String,
  pub message: String,
}

impl ContactForm {
  /// All three fields are required; the page shows a single message when any is blank.
  pub fn clean(&self) -> Result<NewContact, FormErrors> {
    let mut errors = FormErrors::new();
    let (name, email, message) = (self.name.trim(), self.email.trim(), self.message.trim());
    if name.is_empty() || email.is_empty() || message.is_empty() {
      errors.add_non_field("All fields are required.");
    } else {
      if name.chars().count() > MAX_CONTACT_NAME_LENGTH {
        errors.add("name", format!("Ensure this value has at most {} characters.", MAX_CONTACT_NAME_LENGTH));
      }
      if !looks_like_email(email) {
        errors.add("email", "Enter a valid email address.");
      }
    }
    errors.into_result(|| NewContact {
      name: name.to_string(),
      email: email.to_string(),
      message: message.to_string(),
    })
  }
}

// --- Product ---

/// Text fields of the dashboard product form; the image travels separately.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProductForm {
  pub name: String,
  pub description: String,
  pub price: String,
  pub stock: String,
  pub is_active: bool,
}

impl ProductForm {
  pub fn from_product(product: &crate::models::Product) -> Self {
    Self {
      name: product.name.clone(),
      description: product.description.clone(),
      price: product.price.round_dp(2).to_string(),
      stock: product.stock.to_string(),
      is_active: product.is_active,
    }
  }

  pub fn blank() -> Self {
    Self { is_active: true, ..Self::default() }
  }

  /// Produces the input with `image` set to `current_image`; the caller swaps
  /// in an uploaded or cleared image afterwards.
  pub fn clean(&self, current_image: Option<String>) -> Result<ProductInput, FormErrors> {
    let mut errors = FormErrors::new();
    let name = self.name.trim();
    if name.is_empty() {
      errors.add("name", "This field is required.");
    } else if name.chars().count() > MAX_PRODUCT_NAME_LENGTH {
      errors.add("name", format!("Ensure this value has at most {} characters.", MAX_PRODUCT_NAME_LENGTH));
    }

    let price = match parse_price(&self.price) {
      Ok(price) => Some(price),
      Err(message) => {
        errors.add("price", message);
        None
      }
    };

    let stock = match self.stock.trim() {
      "" => {
        errors.add("stock", "This field is required.");
        None
      }
      raw => match raw.parse::<i32>() {
        Ok(n) if n >= 0 => Some(n),
        Ok(_) => {
          errors.add("stock", "Ensure this value is greater than or equal to 0.");
          None
        }
        Err(_) => {
          errors.add("stock", "Enter a whole number.");
          None
        }
      },
    };

    match (price, stock) {
      (Some(price), Some(stock)) if errors.is_empty() => Ok(ProductInput {
        name: name.to_string(),
        description: self.description.trim().to_string(),
        price,
        stock,
        is_active: self.is_active,
        image: current_image,
      }),
      _ => Err(errors),
    }
  }
}

/// Non-negative decimal with at most two fractional digits and at most ten digits in total.
pub fn parse_price(raw: &str) -> Result<Decimal, String> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Err("This field is required.".to_string());
  }
  let price = Decimal::from_str(raw).map_err(|_| "Enter a number.".to_string())?;
  if price.is_sign_negative() && !price.is_zero() {
    return Err("Ensure this value is greater than or equal to 0.".to_string());
  }
  if price.scale() > 2 && price.normalize().scale() > 2 {
    return Err("Ensure that there are no more than 2 decimal places.".to_string());
  }
  if price.trunc() >= Decimal::from(100_000_000) {
    return Err("Ensure that there are no more than 8 digits before the decimal point.".to_string());
  }
  Ok(price.round_dp(2))
}
