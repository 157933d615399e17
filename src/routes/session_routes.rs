use actix_web::web;
use crate::controllers::session_controller;

pub fn session_routes() -> impl FnOnce(&mut web::ServiceConfig) {
    move |config: &mut web::ServiceConfig| {
        config.service(web::scope("/sessions")
            .route("", web::post().to(session_controller::create))
            .route("", web::delete().to(session_controller::destroy))
            .route("/new", web::get().to(session_controller::new))
        );
    }
}
