// storefront/src/web/handlers/ws_handlers.rs

//! `/ws/cart/{room_name}/`: every JSON frame a member sends is rebroadcast to
//! all members of the room, the sender included.
//!
//! Rooms named `user-<id>` carry that user's cart pushes and only admit the
//! signed-in owner. Any other valid name is an open room.

use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{CloseReason, Message, MessageStream, Session};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, instrument, warn};

use crate::errors::AppError;
use crate::models::User;
use crate::realtime::{cart_group, CartEvent, RoomHub, USER_ROOM_PREFIX};
use crate::state::AppState;
use crate::web::extractors::MaybeUser;

const MAX_ROOM_NAME_LENGTH: usize = 100;

/// Room names become part of the group key; keep them to a conservative alphabet.
pub fn valid_room_name(name: &str) -> bool {
  !name.is_empty()
    && name.len() < MAX_ROOM_NAME_LENGTH
    && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Checks that `user` may join `room_name`. Private user rooms need a session
/// whose user id matches the room's.
pub fn authorize_room(room_name: &str, user: Option<&User>) -> Result<(), AppError> {
  let Some(owner) = room_name.strip_prefix(USER_ROOM_PREFIX) else {
    return Ok(());
  };
  let user = user.ok_or_else(|| AppError::Auth("Authentication required.".to_string()))?;
  match owner.parse::<i64>() {
    Ok(owner_id) if owner_id == user.id => Ok(()),
    _ => Err(AppError::Forbidden("You cannot join this room.".to_string())),
  }
}

#[instrument(name = "handler::cart_socket", skip(req, body, app_state, user), fields(room = %path))]
pub async fn cart_socket(
  req: HttpRequest,
  body: web::Payload,
  path: web::Path<String>,
  app_state: web::Data<AppState>,
  user: MaybeUser,
) -> Result<HttpResponse, actix_web::Error> {
  let room_name = path.into_inner();
  if !valid_room_name(&room_name) {
    return Err(AppError::Validation(format!("Invalid room name '{}'.", room_name)).into());
  }
  if let Err(e) = authorize_room(&room_name, user.user()) {
    warn!(room = %room_name, user_id = ?user.user().map(|u| u.id), "Refused cart room join.");
    return Err(e.into());
  }

  let (response, session, stream) = actix_ws::handle(&req, body)?;
  let group = cart_group(&room_name);
  let rooms = app_state.rooms.clone();
  let receiver = rooms.join(&group);
  info!(group = %group, members = rooms.member_count(&group), "Client joined cart room.");

  actix_rt::spawn(relay(rooms, group, session, stream, receiver));
  Ok(response)
}

async fn relay(
  rooms: Arc<RoomHub>,
  group: String,
  mut session: Session,
  mut stream: MessageStream,
  mut receiver: broadcast::Receiver<CartEvent>,
) {
  let mut close_reason: Option<CloseReason> = None;

  loop {
    tokio::select! {
      frame = stream.recv() => match frame {
        Some(Ok(Message::Text(text))) => match CartEvent::from_client_text(&text) {
          Ok(event) => {
            let delivered = rooms.publish(&group, event);
            debug!(group = %group, delivered, "Relayed client frame.");
          }
          Err(reason) => warn!(group = %group, %reason, "Dropping client frame."),
        },
        Some(Ok(Message::Ping(bytes))) => {
          if session.pong(&bytes).await.is_err() {
            break;
          }
        }
        Some(Ok(Message::Close(reason))) => {
          close_reason = reason;
          break;
        }
        Some(Ok(Message::Binary(_))) => warn!(group = %group, "Dropping binary frame."),
        Some(Ok(_)) => {}
        Some(Err(e)) => {
          warn!(group = %group, error = %e, "WebSocket protocol error.");
          break;
        }
        None => break,
      },
      event = receiver.recv() => match event {
        Ok(event) => {
          let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
              warn!(group = %group, error = %e, "Failed to encode cart event.");
              continue;
            }
          };
          if session.text(payload).await.is_err() {
            break;
          }
        }
        Err(RecvError::Lagged(skipped)) => warn!(group = %group, skipped, "Slow room member skipped events."),
        Err(RecvError::Closed) => break,
      },
    }
  }

  rooms.leave(&group, receiver);
  let _ = session.close(close_reason).await;
  info!(group = %group, "Client left cart room.");
}
