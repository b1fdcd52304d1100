// storefront/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart;
pub mod cart_item;
pub mod contact;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartLine};
pub use cart_item::CartItem;
pub use contact::{Contact, NewContact};
pub use product::{Product, ProductFilter, ProductInput};
pub use session::Session;
pub use user::{NewUser, ProfileUpdate, User};
