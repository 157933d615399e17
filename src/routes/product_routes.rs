use actix_web::web;
use crate::controllers::{product_controller, review_controller};

pub fn product_routes() -> impl FnOnce(&mut web::ServiceConfig) {
    move |config: &mut web::ServiceConfig| {
        config.service(web::scope("/products")
            .route("", web::get().to(product_controller::index))
            .route("", web::post().to(product_controller::create))
            .route("/new", web::get().to(product_controller::new))
            // nested resource; registered before the `{id}` routes
            .service(web::scope("/{product_id}/reviews")
                .route("", web::post().to(review_controller::create))
                .route("/{id}", web::get().to(review_controller::show))
                .route("/{id}", web::delete().to(review_controller::destroy))
            )
            .route("/{id}", web::get().to(product_controller::show))
            .route("/{id}", web::patch().to(product_controller::update))
            .route("/{id}", web::put().to(product_controller::update))
            .route("/{id}", web::delete().to(product_controller::destroy))
            .route("/{id}/edit", web::get().to(product_controller::edit))
        );
    }
}
