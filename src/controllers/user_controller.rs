use actix_web::{web, HttpResponse};
use bcrypt::hash;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::{error, info};
use serde_json::json;

use crate::config::Config;
use crate::controllers::{into_params, Params};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{now, NewUser, User, UserParams};
use crate::schema::users;
use crate::session::SessionStore;
use crate::validation::{validate_user, ValidationErrors};

pub async fn new() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "user": UserParams::default() }))
}

/// Signs the user up and logs them in.
pub async fn create(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    sessions: web::Data<SessionStore>,
    body: Params<UserParams>,
) -> Result<HttpResponse, ApiError> {
    let valid = validate_user(&into_params(body))?;
    let cost = config.bcrypt_cost;
    let mut conn = pool.get()?;

    let user = web::block(move || -> Result<User, ApiError> {
        let password_digest = hash(&valid.password, cost)?;
        diesel::insert_into(users::table)
            .values(&NewUser::new(valid, password_digest, now()))
            .returning(User::as_returning())
            .get_result::<User>(&mut conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ApiError::Validation(ValidationErrors::single("email", "has already been taken"))
                }
                other => {
                    error!("Failed to create user due to a database error: {:?}", other);
                    ApiError::from(other)
                }
            })
    })
    .await??;

    info!("User {} created successfully.", user.id);
    Ok(HttpResponse::Created()
        .cookie(sessions.login_cookie(user.id)?)
        .json(json!({ "user": user })))
}
