use std::error::Error;

use log::info;
use storefront::config::Config;
use storefront::db::{establish_connection, run_migrations};
use storefront::seed::seed_products;

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .target(env_logger::Target::Stdout)
        .init();

    let pool = establish_connection(&config.database_url)?;
    run_migrations(&pool)?;

    let mut conn = pool.get()?;
    for product in seed_products(&mut conn)? {
        info!("Seeded product {}: {} ({})", product.id, product.name, product.dollars_conversion());
    }
    println!("Database seeded successfully.");
    Ok(())
}
