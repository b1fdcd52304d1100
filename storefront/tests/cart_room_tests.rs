// tests/cart_room_tests.rs
#[macro_use]
mod common;
use actix_codec::Framed;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use awc::error::WsClientError;
use awc::ws::{Codec, Frame, Message};
use awc::BoxedSocket;
use common::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use storefront::realtime::user_room;

type Socket = Framed<BoxedSocket, Codec>;

const FRAME_WAIT: Duration = Duration::from_secs(5);
const QUIET_WAIT: Duration = Duration::from_millis(300);

fn start_server(env: &TestEnv) -> actix_test::TestServer {
  let state = env.state.clone();
  actix_test::start(move || {
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(storefront::web::configure_app_routes)
  })
}

async fn open_socket(
  srv: &actix_test::TestServer,
  room: &str,
  cookie: Option<Cookie<'static>>,
) -> Result<Socket, WsClientError> {
  let mut request = awc::Client::new().ws(srv.url(&format!("/ws/cart/{}/", room)));
  if let Some(cookie) = cookie {
    request = request.cookie(cookie);
  }
  let (_, socket) = request.connect().await?;
  Ok(socket)
}

async fn connect(srv: &actix_test::TestServer, room: &str) -> Socket {
  open_socket(srv, room, None).await.expect("websocket handshake")
}

async fn connect_as(srv: &actix_test::TestServer, room: &str, cookie: Cookie<'static>) -> Socket {
  open_socket(srv, room, Some(cookie)).await.expect("websocket handshake")
}

async fn send_text(socket: &mut Socket, text: &str) {
  socket.send(Message::Text(text.into())).await.expect("send frame");
}

async fn next_event(socket: &mut Socket) -> Value {
  let frame = tokio::time::timeout(FRAME_WAIT, socket.next())
    .await
    .expect("frame before timeout")
    .expect("socket still open")
    .expect("valid frame");
  match frame {
    Frame::Text(bytes) => serde_json::from_slice(&bytes).expect("JSON frame"),
    other => panic!("unexpected frame {:?}", other),
  }
}

async fn stays_quiet(socket: &mut Socket) -> bool {
  tokio::time::timeout(QUIET_WAIT, socket.next()).await.is_err()
}

async fn wait_for_no_rooms(env: &TestEnv) {
  for _ in 0..50 {
    if env.state.rooms.room_count() == 0 {
      return;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
  }
  panic!("rooms still open: {}", env.state.rooms.room_count());
}

#[actix_web::test]
async fn test_frames_reach_every_member_of_the_room_only() {
  let env = TestEnv::new();
  let srv = start_server(&env);
  let mut alice = connect(&srv, "lobby").await;
  let mut bob = connect(&srv, "lobby").await;
  let mut carol = connect(&srv, "kitchen").await;
  assert_eq!(env.state.rooms.room_count(), 2);

  send_text(&mut alice, r#"{"type": "cart_item_added", "product_id": 3}"#).await;
  let expected = json!({"type": "cart_item_added", "data": {"type": "cart_item_added", "product_id": 3}});
  assert_eq!(next_event(&mut alice).await, expected);
  assert_eq!(next_event(&mut bob).await, expected);
  assert!(stays_quiet(&mut carol).await);

  for socket in [&mut alice, &mut bob, &mut carol] {
    socket.send(Message::Close(None)).await.expect("send close");
  }
  wait_for_no_rooms(&env).await;

  let mut resp = srv.get("/health").send().await.expect("health request");
  let body: Value = resp.json().await.expect("health body");
  assert_eq!(body["rooms"], json!(0));
}

#[actix_web::test]
async fn test_garbage_and_binary_frames_are_dropped() {
  let env = TestEnv::new();
  let srv = start_server(&env);
  let mut alice = connect(&srv, "lobby").await;
  let mut bob = connect(&srv, "lobby").await;

  send_text(&mut alice, "not json").await;
  send_text(&mut alice, r#"{"type": "shutdown"}"#).await;
  alice.send(Message::Binary(vec![1u8, 2, 3].into())).await.expect("send binary");
  send_text(&mut alice, r#"{"items": []}"#).await;

  // Only the last frame is relayed, and the connection survives the rest.
  let expected = json!({"type": "cart_update", "data": {"items": []}});
  assert_eq!(next_event(&mut bob).await, expected);
  assert_eq!(next_event(&mut alice).await, expected);
  assert!(stays_quiet(&mut bob).await);
}

#[actix_web::test]
async fn test_user_room_receives_cart_api_pushes() {
  let env = TestEnv::new();
  let user = env.user("ana").await;
  let mug = env.product("Mug", 500, true).await;
  let cookie = env.login_cookie(&user).await;
  let srv = start_server(&env);
  let mut tab = connect_as(&srv, &user_room(user.id), cookie.clone()).await;

  let resp = srv
    .post("/api/cart/update/")
    .cookie(cookie)
    .send_json(&json!({"product_id": mug.id, "quantity": 2}))
    .await
    .expect("cart update");
  assert_eq!(resp.status(), StatusCode::OK);

  let event = next_event(&mut tab).await;
  assert_eq!(event["type"], json!("cart_update"));
  assert_eq!(event["data"]["items"][0]["quantity"], json!(2));
  assert_eq!(event["data"]["total"].as_f64(), Some(10.0));
}

#[actix_web::test]
async fn test_user_rooms_refuse_anonymous_and_other_users() {
  let env = TestEnv::new();
  let owner = env.user("ana").await;
  let other = env.user("bob").await;
  let other_cookie = env.login_cookie(&other).await;
  let owner_cookie = env.login_cookie(&owner).await;
  let app = test_app!(env);
  let uri = format!("/ws/cart/{}/", user_room(owner.id));

  let handshake = |req: test::TestRequest| {
    req
      .uri(&uri)
      .insert_header(("upgrade", "websocket"))
      .insert_header(("connection", "upgrade"))
      .insert_header(("sec-websocket-version", "13"))
      .insert_header(("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ=="))
      .to_request()
  };

  let resp = test::call_service(&app, handshake(test::TestRequest::get())).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = test::call_service(&app, handshake(test::TestRequest::get().cookie(other_cookie))).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert_eq!(env.state.rooms.room_count(), 0);

  let resp = test::call_service(&app, handshake(test::TestRequest::get().cookie(owner_cookie))).await;
  assert_eq!(resp.status(), StatusCode::SWITCHING_PROTOCOLS);
}

#[actix_web::test]
async fn test_anonymous_socket_cannot_listen_to_a_users_cart() {
  let env = TestEnv::new();
  let user = env.user("ana").await;
  let srv = start_server(&env);

  match open_socket(&srv, &user_room(user.id), None).await {
    Err(WsClientError::InvalidResponseStatus(status)) => assert_eq!(status, StatusCode::UNAUTHORIZED),
    Err(other) => panic!("unexpected handshake error {:?}", other),
    Ok(_) => panic!("anonymous socket joined a user room"),
  }
  assert_eq!(env.state.rooms.room_count(), 0);
}
