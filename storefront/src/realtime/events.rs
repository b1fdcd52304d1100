// storefront/src/realtime/events.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartEventKind {
  CartUpdate,
  CartItemAdded,
  CartItemRemoved,
}

impl CartEventKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      CartEventKind::CartUpdate => "cart_update",
      CartEventKind::CartItemAdded => "cart_item_added",
      CartEventKind::CartItemRemoved => "cart_item_removed",
    }
  }
}

impl FromStr for CartEventKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "cart_update" => Ok(CartEventKind::CartUpdate),
      "cart_item_added" => Ok(CartEventKind::CartItemAdded),
      "cart_item_removed" => Ok(CartEventKind::CartItemRemoved),
      other => Err(format!("unknown cart event type '{}'", other)),
    }
  }
}

/// Wire shape of every frame sent to room members: `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEvent {
  #[serde(rename = "type")]
  pub kind: CartEventKind,
  pub data: Value,
}

impl CartEvent {
  pub fn new(kind: CartEventKind, data: Value) -> Self {
    Self { kind, data }
  }

  /// Wraps a client frame for rebroadcast. The event type comes from the
  /// frame's own `type` field (default `cart_update`); `data` is the whole frame.
  pub fn from_client_text(text: &str) -> Result<Self, String> {
    let frame: Value = serde_json::from_str(text).map_err(|e| format!("invalid JSON: {}", e))?;
    let kind = match frame.get("type") {
      None | Some(Value::Null) => CartEventKind::CartUpdate,
      Some(Value::String(s)) => s.parse()?,
      Some(other) => return Err(format!("event type must be a string, got {}", other)),
    };
    Ok(Self::new(kind, frame))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn client_frames_default_to_cart_update() {
    let event = CartEvent::from_client_text(r#"{"items": []}"#).unwrap();
    assert_eq!(event.kind, CartEventKind::CartUpdate);
    assert_eq!(event.data, json!({"items": []}));
  }

  #[test]
  fn client_frame_type_is_kept_and_data_is_the_whole_frame() {
    let event = CartEvent::from_client_text(r#"{"type": "cart_item_added", "product_id": 3}"#).unwrap();
    assert_eq!(event.kind, CartEventKind::CartItemAdded);
    assert_eq!(
      serde_json::to_value(&event).unwrap(),
      json!({"type": "cart_item_added", "data": {"type": "cart_item_added", "product_id": 3}})
    );
  }

  #[test]
  fn unknown_types_and_garbage_are_rejected() {
    assert!(CartEvent::from_client_text(r#"{"type": "shutdown"}"#).is_err());
    assert!(CartEvent::from_client_text("not json").is_err());
    assert!(CartEvent::from_client_text(r#"{"type": 7}"#).is_err());
  }
}
