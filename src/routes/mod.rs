use actix_web::web;

use crate::controllers::product_controller;

pub mod product_routes;
pub mod session_routes;
pub mod user_routes;

/// The whole routing table, root included.
pub fn configure(config: &mut web::ServiceConfig) {
    config
        .route("/", web::get().to(product_controller::index))
        .configure(product_routes::product_routes())
        .configure(user_routes::user_routes())
        .configure(session_routes::session_routes());
}
