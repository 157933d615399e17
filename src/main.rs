use actix_web::{middleware, web, App, HttpServer};
use env_logger::{Env, Target};
use log::info;

use storefront::config::Config;
use storefront::db::{establish_connection, run_migrations};
use storefront::routes;
use storefront::session::SessionStore;

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env().map_err(std::io::Error::other)?;

    env_logger::Builder::from_env(Env::default().default_filter_or(&config.log_level))
        .target(Target::Stdout)
        .init();

    let pool = establish_connection(&config.database_url).map_err(std::io::Error::other)?;
    run_migrations(&pool).map_err(std::io::Error::other)?;
    let sessions = web::Data::new(
        SessionStore::from_secret(config.secret_key_base.as_deref()).map_err(std::io::Error::other)?,
    );
    let bind_address = config.bind_address();
    let config = web::Data::new(config);

    info!("Starting storefront on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(sessions.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
