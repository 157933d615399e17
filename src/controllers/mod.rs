use actix_web::{web, Either};
use serde::de::DeserializeOwned;

pub mod product_controller;
pub mod review_controller;
pub mod session_controller;
pub mod user_controller;

/// Request body accepted as JSON or as an urlencoded form.
pub type Params<T> = Either<web::Json<T>, web::Form<T>>;

pub fn into_params<T: DeserializeOwned>(body: Params<T>) -> T {
    match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}
