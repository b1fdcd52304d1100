// storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  auth_handlers, cart_handlers, dashboard_handlers, page_handlers, product_handlers, profile_handlers, ws_handlers,
};

// Called from `main.rs` and the integration tests to configure the Actix App.
// Media files are mounted separately because their prefix comes from the config.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    // Health Check Route
    .route("/health", web::get().to(page_handlers::health))
    // Storefront pages
    .route("/", web::get().to(page_handlers::index))
    .route("/cart/", web::get().to(page_handlers::cart_page))
    .route("/order/", web::get().to(page_handlers::order_page))
    .service(
      web::resource("/contact/")
        .route(web::get().to(page_handlers::contact_form))
        .route(web::post().to(page_handlers::contact_submit)),
    )
    // Accounts
    .service(
      web::resource("/login/")
        .route(web::get().to(auth_handlers::login_form))
        .route(web::post().to(auth_handlers::login_submit)),
    )
    .service(
      web::resource("/logout/")
        .route(web::get().to(auth_handlers::logout))
        .route(web::post().to(auth_handlers::logout)),
    )
    .service(
      web::resource("/register/")
        .route(web::get().to(auth_handlers::register_form))
        .route(web::post().to(auth_handlers::register_submit)),
    )
    .service(
      web::resource("/profile/")
        .route(web::get().to(profile_handlers::profile_form))
        .route(web::post().to(profile_handlers::profile_submit)),
    )
    .service(
      web::resource("/profile/password/")
        .route(web::get().to(profile_handlers::password_form))
        .route(web::post().to(profile_handlers::password_submit)),
    )
    // JSON API. Mutations accept any method and answer non-POST with 400.
    .service(
      web::scope("/api")
        .service(
          web::scope("/cart")
            .route("/get/", web::get().to(cart_handlers::get_cart))
            .route("/update/", web::route().to(cart_handlers::update_cart))
            .route("/clear/", web::route().to(cart_handlers::clear_cart)),
        )
        .route("/products/find/", web::get().to(product_handlers::find_product)),
    )
    // Staff dashboard
    .service(
      web::scope("/dashboard")
        .route("/products/", web::get().to(dashboard_handlers::product_list))
        .service(
          web::resource("/products/add/")
            .route(web::get().to(dashboard_handlers::product_create_form))
            .route(web::post().to(dashboard_handlers::product_create)),
        )
        .route("/products/export/pdf/", web::get().to(dashboard_handlers::export_products_pdf))
        .service(
          web::resource("/products/{product_id}/edit/")
            .route(web::get().to(dashboard_handlers::product_edit_form))
            .route(web::post().to(dashboard_handlers::product_update)),
        )
        .service(
          web::resource("/products/{product_id}/delete/")
            .route(web::get().to(dashboard_handlers::product_delete_confirm))
            .route(web::post().to(dashboard_handlers::product_delete)),
        )
        .route("/contacts/", web::get().to(dashboard_handlers::contact_list)),
    )
    // Cart room relay
    .route("/ws/cart/{room_name}/", web::get().to(ws_handlers::cart_socket))
    .default_service(web::to(page_handlers::not_found));
}
