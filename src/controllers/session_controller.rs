use actix_web::{web, HttpResponse};
use bcrypt::verify;
use diesel::prelude::*;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::controllers::{into_params, Params};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use crate::session::{RequestContext, SessionStore};

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

pub async fn new(
    pool: web::Data<DbPool>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let current_user = ctx.current_user(&pool).await?;
    Ok(HttpResponse::Ok().json(json!({
        "session": LoginRequest::default(),
        "current_user": current_user,
    })))
}

pub async fn create(
    pool: web::Data<DbPool>,
    sessions: web::Data<SessionStore>,
    body: Params<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let login = into_params(body);
    let mut conn = pool.get()?;

    let user = web::block(move || -> Result<User, ApiError> {
        let email = login.email.trim().to_lowercase();
        let user = users::table
            .filter(users::email.eq(&email))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()?;
        let Some(user) = user else {
            return Err(ApiError::InvalidCredentials);
        };
        if verify(&login.password, &user.password_digest)? {
            Ok(user)
        } else {
            Err(ApiError::InvalidCredentials)
        }
    })
    .await??;

    info!("User {} logged in.", user.id);
    Ok(HttpResponse::Ok()
        .cookie(sessions.login_cookie(user.id)?)
        .json(json!({ "user": user })))
}

pub async fn destroy(ctx: RequestContext, sessions: web::Data<SessionStore>) -> HttpResponse {
    if let Some(user_id) = ctx.user_id() {
        info!("User {} logged out.", user_id);
    }
    HttpResponse::Ok()
        .cookie(sessions.logout_cookie())
        .json(json!({"message": "Logged out"}))
}
