use diesel::prelude::*;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{now, NewProduct, Product, ProductParams};
use crate::schema::products;
use crate::validation::validate_product;

pub const SEED_PRODUCTS: [(&str, &str, i64); 2] = [
    ("Iphone", "Phone", 700000),
    ("Stuff", "Useless", 1000),
];

/// Inserts the demo catalogue. Running it again inserts the rows again.
pub fn seed_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, ApiError> {
    let mut created = Vec::with_capacity(SEED_PRODUCTS.len());
    for (name, description, price_in_cents) in SEED_PRODUCTS {
        let valid = validate_product(&ProductParams {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            price_in_cents: Some(Value::from(price_in_cents)),
        })?;
        let product = diesel::insert_into(products::table)
            .values(&NewProduct::new(valid, now()))
            .returning(Product::as_returning())
            .get_result::<Product>(conn)?;
        created.push(product);
    }
    Ok(created)
}
