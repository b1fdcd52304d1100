// storefront/src/realtime/mod.rs

//! Room-scoped cart broadcast used by the WebSocket relay and by the cart API
//! to notify a user's other open pages.

pub mod events;
pub mod rooms;

pub use events::{CartEvent, CartEventKind};
pub use rooms::RoomHub;

/// Group key of a client-chosen room name.
pub fn cart_group(room_name: &str) -> String {
  format!("cart_{}", room_name)
}

/// Room-name prefix reserved for per-user rooms.
pub const USER_ROOM_PREFIX: &str = "user-";

/// Room name a signed-in user's pages share.
pub fn user_room(user_id: i64) -> String {
  format!("{}{}", USER_ROOM_PREFIX, user_id)
}

/// Group of [`user_room`]; the cart API publishes here.
pub fn user_group(user_id: i64) -> String {
  cart_group(&user_room(user_id))
}
