// tests/account_tests.rs
#[macro_use]
mod common;
use actix_web::http::StatusCode;
use actix_web::test;
use common::*;

#[actix_web::test]
async fn test_register_creates_user_and_cart() {
  let env = TestEnv::new();
  let app = test_app!(env);

  let req = test::TestRequest::post()
    .uri("/register/")
    .set_form([
      ("username", "ana"),
      ("email", "ana@example.com"),
      ("password1", "longenough1"),
      ("password2", "longenough1"),
    ])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(location(&resp).starts_with("/login/?message="));

  let user = env.store().find_user_by_username("ana").await.unwrap().expect("user stored");
  assert!(env.store().find_cart(user.id).await.unwrap().is_some());
}

#[actix_web::test]
async fn test_register_rerenders_with_field_errors() {
  let env = TestEnv::new();
  env.user("ana").await;
  let app = test_app!(env);

  let req = test::TestRequest::post()
    .uri("/register/")
    .set_form([
      ("username", "ana"),
      ("email", "someone@example.com"),
      ("password1", "longenough1"),
      ("password2", "different1"),
    ])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(html.contains("The two password fields didn"));
  assert!(html.contains("someone@example.com"));
}

#[actix_web::test]
async fn test_login_sets_session_cookie_and_honours_next() {
  let env = TestEnv::new();
  env.user("ana").await;
  let app = test_app!(env);

  let req = test::TestRequest::post()
    .uri("/login/")
    .set_form([("username", "ana"), ("password", PASSWORD), ("next", "/order/")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/order/");

  let cookie = resp
    .response()
    .cookies()
    .find(|c| c.name() == "sessionid")
    .expect("session cookie")
    .into_owned();
  assert_eq!(cookie.http_only(), Some(true));

  let req = test::TestRequest::get().uri("/order/").cookie(cookie).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_login_ignores_offsite_next() {
  let env = TestEnv::new();
  env.user("ana").await;
  let app = test_app!(env);

  let req = test::TestRequest::post()
    .uri("/login/")
    .set_form([("username", "ana"), ("password", PASSWORD), ("next", "https://evil.example/")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_login_with_wrong_password_shows_error() {
  let env = TestEnv::new();
  env.user("ana").await;
  let app = test_app!(env);

  let req = test::TestRequest::post()
    .uri("/login/")
    .set_form([("username", "ana"), ("password", "wrong-password")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(resp.response().cookies().next().is_none());
  let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(html.contains("Please enter a correct username and password."));
}

#[actix_web::test]
async fn test_login_required_pages_redirect_anonymous_visitors() {
  let env = TestEnv::new();
  let app = test_app!(env);

  for (uri, expected) in [
    ("/profile/", "/login/?next=%2Fprofile%2F"),
    ("/profile/password/", "/login/?next=%2Fprofile%2Fpassword%2F"),
    ("/order/", "/login/?next=%2Forder%2F"),
  ] {
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
    assert_eq!(location(&resp), expected);
  }
}

#[actix_web::test]
async fn test_logout_ends_the_session() {
  let env = TestEnv::new();
  let user = env.user("ana").await;
  let cookie = env.login_cookie(&user).await;
  let app = test_app!(env);

  let req = test::TestRequest::post().uri("/logout/").cookie(cookie.clone()).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(location(&resp), "/");

  let req = test::TestRequest::get().uri("/api/cart/get/").cookie(cookie).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_profile_update_and_uniqueness() {
  let env = TestEnv::new();
  let user = env.user("ana").await;
  env.user("bob").await;
  let cookie = env.login_cookie(&user).await;
  let app = test_app!(env);

  let req = test::TestRequest::post()
    .uri("/profile/")
    .cookie(cookie.clone())
    .set_form([
      ("username", "ana"),
      ("email", "BOB@example.com"),
      ("first_name", "Ana"),
      ("last_name", "Lima"),
    ])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(html.contains("A user with that email already exists."));

  let req = test::TestRequest::post()
    .uri("/profile/")
    .cookie(cookie)
    .set_form([
      ("username", "ana"),
      ("email", "ana.lima@example.com"),
      ("first_name", "Ana"),
      ("last_name", "Lima"),
    ])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let updated = env.store().find_user(user.id).await.unwrap().unwrap();
  assert_eq!(updated.email, "ana.lima@example.com");
  assert_eq!(updated.first_name, "Ana");
}

#[actix_web::test]
async fn test_password_change_keeps_current_session_only() {
  let env = TestEnv::new();
  let user = env.user("ana").await;
  let current = env.login_cookie(&user).await;
  let other = env.login_cookie(&user).await;
  let app = test_app!(env);

  let req = test::TestRequest::post()
    .uri("/profile/password/")
    .cookie(current.clone())
    .set_form([
      ("old_password", PASSWORD),
      ("new_password1", "brand-new-pass"),
      ("new_password2", "brand-new-pass"),
    ])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let still_in = test::TestRequest::get().uri("/api/cart/get/").cookie(current).to_request();
  assert_eq!(test::call_service(&app, still_in).await.status(), StatusCode::OK);
  let kicked = test::TestRequest::get().uri("/api/cart/get/").cookie(other).to_request();
  assert_eq!(test::call_service(&app, kicked).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_contact_form() {
  let env = TestEnv::new();
  let app = test_app!(env);

  let req = test::TestRequest::post()
    .uri("/contact/")
    .set_form([("name", "Ana"), ("email", ""), ("message", "Hello")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(html.contains("All fields are required."));
  assert!(env.store().list_contacts().await.unwrap().is_empty());

  let req = test::TestRequest::post()
    .uri("/contact/")
    .set_form([("name", "Ana"), ("email", "ana@example.com"), ("message", "Hello")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(location(&resp).starts_with("/contact/?message=Thanks"));
  let contacts = env.store().list_contacts().await.unwrap();
  assert_eq!(contacts.len(), 1);
  assert_eq!(contacts[0].message, "Hello");
}
