use std::cell::OnceCell;
use std::future::{ready, Future, Ready};
use std::rc::Rc;

use actix_web::cookie::{Cookie, CookieJar, Key, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use diesel::prelude::*;
use log::{debug, warn};

use crate::config::ConfigError;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;

pub const SESSION_COOKIE: &str = "_storefront_session";
pub const MIN_SECRET_LEN: usize = 32;

/// Cookie-backed session state, signed so the user id cannot be forged.
#[derive(Clone)]
pub struct SessionStore {
    key: Key,
}

impl SessionStore {
    pub fn new(key: Key) -> Self {
        SessionStore { key }
    }

    pub fn from_secret(secret: Option<&str>) -> Result<Self, ConfigError> {
        match secret {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                Err(ConfigError::WeakSecret(MIN_SECRET_LEN))
            }
            Some(secret) => Ok(SessionStore::new(Key::derive_from(secret.as_bytes()))),
            None => {
                warn!("SECRET_KEY_BASE is not set; sessions will not survive a restart");
                Ok(SessionStore::new(Key::generate()))
            }
        }
    }

    /// The `user_id` carried by the request's session, if it verifies.
    pub fn user_id(&self, req: &HttpRequest) -> Option<i32> {
        let cookie = req.cookie(SESSION_COOKIE)?;
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        match jar.signed(&self.key).get(SESSION_COOKIE) {
            Some(verified) => verified.value().parse().ok(),
            None => {
                warn!("Ignoring session cookie with an invalid signature");
                None
            }
        }
    }

    pub fn login_cookie(&self, user_id: i32) -> Result<Cookie<'static>, ApiError> {
        let cookie = Cookie::build(SESSION_COOKIE, user_id.to_string())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish();
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);
        jar.get(SESSION_COOKIE)
            .cloned()
            .ok_or_else(|| ApiError::SessionError("failed to sign session cookie".to_string()))
    }

    pub fn logout_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }
}

struct ContextInner {
    user_id: Option<i32>,
    current_user: OnceCell<Option<User>>,
}

/// State scoped to one request. Extracting it twice in the same request
/// yields the same context, so `current_user` is looked up at most once.
#[derive(Clone)]
pub struct RequestContext {
    inner: Rc<ContextInner>,
}

impl RequestContext {
    pub fn new(user_id: Option<i32>) -> Self {
        RequestContext {
            inner: Rc::new(ContextInner {
                user_id,
                current_user: OnceCell::new(),
            }),
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        self.inner.user_id
    }

    pub async fn current_user(&self, pool: &DbPool) -> Result<Option<User>, ApiError> {
        let pool = pool.clone();
        self.current_user_with(|user_id| async move {
            let mut conn = pool.get()?;
            let user = web::block(move || {
                users::table
                    .find(user_id)
                    .select(User::as_select())
                    .first::<User>(&mut conn)
                    .optional()
            })
            .await??;
            Ok::<_, ApiError>(user)
        })
        .await
    }

    /// Memoizing core of `current_user`; `find` runs on the first call only.
    pub async fn current_user_with<F, Fut>(&self, find: F) -> Result<Option<User>, ApiError>
    where
        F: FnOnce(i32) -> Fut,
        Fut: Future<Output = Result<Option<User>, ApiError>>,
    {
        if let Some(cached) = self.inner.current_user.get() {
            return Ok(cached.clone());
        }

        let user = match self.inner.user_id {
            Some(user_id) => {
                debug!("Loading current user {}", user_id);
                let user = find(user_id).await?;
                if user.is_none() {
                    warn!("Session refers to missing user {}", user_id);
                }
                user
            }
            None => None,
        };

        let _ = self.inner.current_user.set(user.clone());
        Ok(user)
    }
}

impl FromRequest for RequestContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(ctx) = req.extensions().get::<RequestContext>() {
            return ready(Ok(ctx.clone()));
        }

        let Some(store) = req.app_data::<web::Data<SessionStore>>() else {
            return ready(Err(ApiError::SessionError(
                "session store is not configured".to_string(),
            )
            .into()));
        };

        let ctx = RequestContext::new(store.user_id(req));
        req.extensions_mut().insert(ctx.clone());
        ready(Ok(ctx))
    }
}
