use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use log::info;
use serde_json::json;

use crate::controllers::{into_params, Params};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{now, NewReview, Review, ReviewParams};
use crate::schema::{products, reviews};
use crate::session::RequestContext;

pub async fn show(
    pool: web::Data<DbPool>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, ApiError> {
    let (product_id, review_id) = path.into_inner();
    let mut conn = pool.get()?;

    let review = web::block(move || {
        reviews::table
            .filter(reviews::id.eq(review_id))
            .filter(reviews::product_id.eq(product_id))
            .select(Review::as_select())
            .first::<Review>(&mut conn)
    })
    .await??;

    Ok(HttpResponse::Ok().json(review))
}

pub async fn create(
    pool: web::Data<DbPool>,
    ctx: RequestContext,
    product_id: web::Path<i32>,
    body: Params<ReviewParams>,
) -> Result<HttpResponse, ApiError> {
    let params = into_params(body);
    let product_id = product_id.into_inner();
    let user_id = ctx.current_user(&pool).await?.map(|user| user.id);
    let mut conn = pool.get()?;

    let review = web::block(move || {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            products::table
                .find(product_id)
                .select(products::id)
                .first::<i32>(conn)?;

            let stamp = now();
            diesel::insert_into(reviews::table)
                .values(&NewReview {
                    comment: params.comment,
                    product_id: Some(product_id),
                    user_id,
                    created_at: stamp,
                    updated_at: stamp,
                })
                .returning(Review::as_returning())
                .get_result::<Review>(conn)
        })
    })
    .await??;

    info!("Created review {} on product {}", review.id, product_id);
    Ok(HttpResponse::Created().json(review))
}

pub async fn destroy(
    pool: web::Data<DbPool>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, ApiError> {
    let (product_id, review_id) = path.into_inner();
    let mut conn = pool.get()?;

    let deleted = web::block(move || {
        diesel::delete(
            reviews::table
                .filter(reviews::id.eq(review_id))
                .filter(reviews::product_id.eq(product_id)),
        )
        .execute(&mut conn)
    })
    .await??;

    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    info!("Deleted review {} from product {}", review_id, product_id);
    Ok(HttpResponse::Ok().json(json!({"message": "Review deleted successfully"})))
}
