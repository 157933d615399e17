use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use log::info;
use serde::Serialize;
use serde_json::json;

use crate::controllers::{into_params, Params};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{now, NewProduct, Product, ProductChanges, ProductParams, ProductUpdate, Review};
use crate::schema::products::dsl::*;
use crate::schema::reviews;
use crate::session::RequestContext;
use crate::validation::validate_product;

#[derive(Serialize, Debug)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub price_in_dollars: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            price_in_dollars: product.dollars_conversion(),
            product,
        }
    }
}

pub async fn index(
    pool: web::Data<DbPool>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let current_user = ctx.current_user(&pool).await?;
    let mut conn = pool.get()?;

    let results = web::block(move || {
        products
            .order(id.asc())
            .select(Product::as_select())
            .load::<Product>(&mut conn)
    })
    .await??;

    let results: Vec<ProductResponse> = results.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({
        "current_user": current_user,
        "products": results,
    })))
}

pub async fn show(
    pool: web::Data<DbPool>,
    product_id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.get()?;
    let product_id = product_id.into_inner();

    let (product, product_reviews) = web::block(move || {
        let product = products
            .find(product_id)
            .select(Product::as_select())
            .first::<Product>(&mut conn)?;
        let product_reviews = reviews::table
            .filter(reviews::product_id.eq(product_id))
            .order(reviews::id.asc())
            .select(Review::as_select())
            .load::<Review>(&mut conn)?;
        Ok::<_, diesel::result::Error>((product, product_reviews))
    })
    .await??;

    Ok(HttpResponse::Ok().json(json!({
        "product": ProductResponse::from(product),
        "reviews": product_reviews,
    })))
}

pub async fn new() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "product": ProductParams::default() }))
}

pub async fn create(
    pool: web::Data<DbPool>,
    body: Params<ProductParams>,
) -> Result<HttpResponse, ApiError> {
    let valid = validate_product(&into_params(body))?;
    let mut conn = pool.get()?;

    let product = web::block(move || {
        diesel::insert_into(products)
            .values(&NewProduct::new(valid, now()))
            .returning(Product::as_returning())
            .get_result::<Product>(&mut conn)
    })
    .await??;

    info!("Created product {} ({})", product.id, product.name);
    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

pub async fn edit(
    pool: web::Data<DbPool>,
    product_id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.get()?;

    let product = web::block(move || {
        products
            .find(product_id.into_inner())
            .select(Product::as_select())
            .first::<Product>(&mut conn)
    })
    .await??;

    Ok(HttpResponse::Ok().json(json!({
        "id": product.id,
        "product": ProductParams::from(&product),
    })))
}

pub async fn update(
    pool: web::Data<DbPool>,
    product_id: web::Path<i32>,
    body: Params<ProductUpdate>,
) -> Result<HttpResponse, ApiError> {
    let changes = into_params(body);
    let mut conn = pool.get()?;
    let product_id = product_id.into_inner();

    let product = web::block(move || {
        conn.transaction::<_, ApiError, _>(|conn| {
            let existing = products
                .find(product_id)
                .select(Product::as_select())
                .first::<Product>(conn)?;
            let valid = validate_product(&changes.merged_onto(&existing))?;
            let updated = diesel::update(products.find(product_id))
                .set(&ProductChanges::new(valid, now()))
                .returning(Product::as_returning())
                .get_result::<Product>(conn)?;
            Ok(updated)
        })
    })
    .await??;

    info!("Updated product {}", product.id);
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

pub async fn destroy(
    pool: web::Data<DbPool>,
    product_id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.get()?;
    let product_id = product_id.into_inner();

    let deleted = web::block(move || {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(reviews::table.filter(reviews::product_id.eq(product_id)))
                .execute(conn)?;
            diesel::delete(products.find(product_id)).execute(conn)
        })
    })
    .await??;

    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    info!("Deleted product {}", product_id);
    Ok(HttpResponse::Ok().json(json!({"message": "Product deleted successfully"})))
}
