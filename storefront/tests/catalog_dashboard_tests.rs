// tests/catalog_dashboard_tests.rs
#[macro_use]
mod common;
use actix_web::http::{header, StatusCode};
use actix_web::test;
use common::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use storefront::models::NewContact;

const BOUNDARY: &str = "----storefront-test-boundary";

/// Encodes text fields plus an optional `(field, file name, bytes)` file part.
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
  let mut body = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!("--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", BOUNDARY, name, value).as_bytes(),
    );
  }
  if let Some((name, file_name, bytes)) = file {
    body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
        BOUNDARY, name, file_name
      )
      .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
  body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> test::TestRequest {
  test::TestRequest::post()
    .uri(uri)
    .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY)))
    .set_payload(body)
}

#[actix_web::test]
async fn test_index_lists_only_active_products() {
  let env = TestEnv::new();
  env.product("Visible Mug", 1200, true).await;
  env.product("Hidden Tee", 1500, false).await;
  let app = test_app!(env);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(html.contains("Visible Mug"));
  assert!(html.contains("12.00"));
  assert!(!html.contains("Hidden Tee"));
}

#[actix_web::test]
async fn test_find_product_exact_then_partial() {
  let env = TestEnv::new();
  let tea = env.product("Tea", 400, true).await;
  env.product("Green Tea", 600, true).await;
  env.product("Black Tea", 600, false).await;
  let app = test_app!(env);

  let req = test::TestRequest::get().uri("/api/products/find/?name=TEA").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["match"], json!("exact"));
  assert_eq!(body["products"].as_array().unwrap().len(), 1);
  assert_eq!(body["products"][0]["id"], json!(tea.id));

  let req = test::TestRequest::get().uri("/api/products/find/?name=gree").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["match"], json!("partial"));
  assert_eq!(body["products"][0]["name"], json!("Green Tea"));

  let req = test::TestRequest::get().uri("/api/products/find/?name=black").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

  let req = test::TestRequest::get().uri("/api/products/find/").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_dashboard_is_staff_only() {
  let env = TestEnv::new();
  let customer = env.user("ana").await;
  let staff = env.staff("boss").await;
  let customer_cookie = env.login_cookie(&customer).await;
  let staff_cookie = env.login_cookie(&staff).await;
  let app = test_app!(env);

  for uri in ["/dashboard/products/", "/dashboard/products/export/pdf/", "/dashboard/contacts/"] {
    let anonymous = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(anonymous.status(), StatusCode::FOUND, "{}", uri);
    assert!(location(&anonymous).starts_with("/login/?next="));

    let req = test::TestRequest::get().uri(uri).cookie(customer_cookie.clone()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN, "{}", uri);

    let req = test::TestRequest::get().uri(uri).cookie(staff_cookie.clone()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK, "{}", uri);
  }
}

#[actix_web::test]
async fn test_dashboard_list_filters() {
  let env = TestEnv::new();
  let staff = env.staff("boss").await;
  env.product("Blue Mug", 1000, true).await;
  env.product("Red Mug", 1000, false).await;
  env.product("Tote", 1000, true).await;
  let cookie = env.login_cookie(&staff).await;
  let app = test_app!(env);

  let req = test::TestRequest::get().uri("/dashboard/products/?q=mug&active=no").cookie(cookie).to_request();
  let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
  assert!(html.contains("Red Mug"));
  assert!(!html.contains("Blue Mug"));
  assert!(!html.contains("Tote"));
}

#[actix_web::test]
async fn test_create_product_with_image() {
  let env = TestEnv::new();
  let staff = env.staff("boss").await;
  let cookie = env.login_cookie(&staff).await;
  let app = test_app!(env);

  let body = multipart_body(
    &[("name", "Mug"), ("description", "Blue"), ("price", "4.50"), ("stock", "7"), ("is_active", "on")],
    Some(("image", "mug.PNG", b"not-really-a-png")),
  );
  let req = multipart_request("/dashboard/products/add/", body).cookie(cookie).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(location(&resp).starts_with("/dashboard/products/?message="));

  let products = env.store().list_products(&Default::default()).await.unwrap();
  assert_eq!(products.len(), 1);
  let mug = &products[0];
  assert_eq!(mug.price, Decimal::new(450, 2));
  assert_eq!(mug.stock, 7);
  assert!(mug.is_active);
  let image = mug.image.as_deref().expect("stored image");
  assert!(image.starts_with("products/") && image.ends_with(".png"));
  assert!(env.media.path().join(image).exists());
}

#[actix_web::test]
async fn test_create_product_rejects_bad_input() {
  let env = TestEnv::new();
  let staff = env.staff("boss").await;
  let cookie = env.login_cookie(&staff).await;
  let app = test_app!(env);

  let body = multipart_body(
    &[("name", ""), ("price", "-1"), ("stock", "3")],
    Some(("image", "notes.txt", b"hello")),
  );
  let req = multipart_request("/dashboard/products/add/", body).cookie(cookie).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(html.contains("This field is required."));
  assert!(html.contains("Ensure this value is greater than or equal to 0."));
  assert!(html.contains("is not allowed"));
  assert!(env.store().list_products(&Default::default()).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_edit_product_and_clear_image() {
  let env = TestEnv::new();
  let staff = env.staff("boss").await;
  let product = env.product("Mug", 450, true).await;
  let cookie = env.login_cookie(&staff).await;
  let app = test_app!(env);
  let uri = format!("/dashboard/products/{}/edit/", product.id);

  let body = multipart_body(
    &[("name", "Mug"), ("price", "4.50"), ("stock", "7")],
    Some(("image", "mug.jpg", b"jpeg-bytes")),
  );
  let resp = test::call_service(&app, multipart_request(&uri, body).cookie(cookie.clone()).to_request()).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let edited = env.store().find_product(product.id).await.unwrap().unwrap();
  assert!(!edited.is_active);
  let image = edited.image.clone().expect("image stored");
  assert!(env.media.path().join(&image).exists());

  let body = multipart_body(&[("name", "Big Mug"), ("price", "5"), ("stock", "2"), ("image_clear", "on")], None);
  let resp = test::call_service(&app, multipart_request(&uri, body).cookie(cookie).to_request()).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let cleared = env.store().find_product(product.id).await.unwrap().unwrap();
  assert_eq!(cleared.name, "Big Mug");
  assert!(cleared.image.is_none());
  assert!(!env.media.path().join(&image).exists());
}

#[actix_web::test]
async fn test_delete_product_confirms_then_deletes() {
  let env = TestEnv::new();
  let staff = env.staff("boss").await;
  let product = env.product("Mug", 450, true).await;
  let cookie = env.login_cookie(&staff).await;
  let app = test_app!(env);
  let uri = format!("/dashboard/products/{}/delete/", product.id);

  let req = test::TestRequest::get().uri(&uri).cookie(cookie.clone()).to_request();
  let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
  assert!(html.contains("Are you sure you want to delete"));
  assert!(env.store().find_product(product.id).await.unwrap().is_some());

  let req = test::TestRequest::post().uri(&uri).cookie(cookie.clone()).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(env.store().find_product(product.id).await.unwrap().is_none());

  let req = test::TestRequest::get().uri(&uri).cookie(cookie).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_pdf_export() {
  let env = TestEnv::new();
  let staff = env.staff("boss").await;
  for i in 0..40 {
    env.product(&format!("Product {}", i), 100 + i, i % 2 == 0).await;
  }
  let cookie = env.login_cookie(&staff).await;
  let app = test_app!(env);

  let req = test::TestRequest::get().uri("/dashboard/products/export/pdf/").cookie(cookie).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
  assert_eq!(
    resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
    "attachment; filename=\"products.pdf\""
  );
  let body = test::read_body(resp).await;
  assert!(body.starts_with(b"%PDF"));
}

#[actix_web::test]
async fn test_contacts_list_shows_messages() {
  let env = TestEnv::new();
  let staff = env.staff("boss").await;
  env
    .store()
    .create_contact(NewContact {
      name: "Ana".to_string(),
      email: "ana@example.com".to_string(),
      message: "Do you ship abroad?".to_string(),
    })
    .await
    .unwrap();
  let cookie = env.login_cookie(&staff).await;
  let app = test_app!(env);

  let req = test::TestRequest::get().uri("/dashboard/contacts/").cookie(cookie).to_request();
  let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
  assert!(html.contains("Do you ship abroad?"));
  assert!(html.contains("ana@example.com"));
}

#[actix_web::test]
async fn test_cart_socket_rejects_bad_room_names() {
  let env = TestEnv::new();
  let app = test_app!(env);

  let req = test::TestRequest::get().uri("/ws/cart/bad*room/").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health() {
  let env = TestEnv::new();
  let app = test_app!(env);
  let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(body["status"], json!("ok"));
}

#[actix_web::test]
async fn test_unknown_page_renders_not_found() {
  let env = TestEnv::new();
  let app = test_app!(env);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/no-such-page/").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(html.contains("The page you requested does not exist."));
}
