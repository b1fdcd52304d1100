// storefront/src/realtime/rooms.rs

use super::events::CartEvent;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Per-room buffer; receivers that fall further behind skip ahead.
const ROOM_CAPACITY: usize = 64;

/// Registry of broadcast groups keyed by room name. A room exists while it
/// has at least one member.
#[derive(Default)]
pub struct RoomHub {
  rooms: Mutex<HashMap<String, broadcast::Sender<CartEvent>>>,
}

impl RoomHub {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn join(&self, room: &str) -> broadcast::Receiver<CartEvent> {
    let mut rooms = self.rooms.lock();
    let sender = rooms.entry(room.to_string()).or_insert_with(|| {
      debug!(room, "Opening room.");
      broadcast::channel(ROOM_CAPACITY).0
    });
    sender.subscribe()
  }

  /// Drops the member's receiver and closes the room once it is empty.
  pub fn leave(&self, room: &str, receiver: broadcast::Receiver<CartEvent>) {
    drop(receiver);
    let mut rooms = self.rooms.lock();
    if rooms.get(room).is_some_and(|sender| sender.receiver_count() == 0) {
      rooms.remove(room);
      debug!(room, "Closed empty room.");
    }
  }

  /// Sends to every current member; returns how many received it.
  pub fn publish(&self, room: &str, event: CartEvent) -> usize {
    let rooms = self.rooms.lock();
    let delivered = rooms.get(room).and_then(|sender| sender.send(event).ok()).unwrap_or(0);
    trace!(room, delivered, "Published cart event.");
    delivered
  }

  pub fn member_count(&self, room: &str) -> usize {
    self.rooms.lock().get(room).map_or(0, |sender| sender.receiver_count())
  }

  pub fn room_count(&self) -> usize {
    self.rooms.lock().len()
  }
}
