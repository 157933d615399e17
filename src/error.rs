use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Record not found")]
    NotFound,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Database error")]
    DatabaseError(#[source] diesel::result::Error),
    #[error("Connection pool error")]
    PoolError(#[from] r2d2::Error),
    #[error("Blocking error")]
    BlockingError(#[from] BlockingError),
    #[error("Password hashing error")]
    PasswordError(#[from] bcrypt::BcryptError),
    #[error("Session error: {0}")]
    SessionError(String),
    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => ApiError::NotFound,
            other => ApiError::DatabaseError(other),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            ApiError::Validation(errors) => HttpResponse::build(status).json(json!({
                "errors": errors.to_json(),
                "full_messages": errors.full_messages(),
            })),
            ApiError::NotFound | ApiError::InvalidCredentials => {
                HttpResponse::build(status).json(json!({"error": self.to_string()}))
            }
            ApiError::DatabaseError(e) => {
                error!("Database error: {:?}", e);
                HttpResponse::build(status).json("Database error")
            }
            ApiError::PoolError(e) => {
                error!("Failed to get DB connection: {:?}", e);
                HttpResponse::build(status).json("Connection pool error")
            }
            ApiError::BlockingError(e) => {
                error!("Error while processing request: {:?}", e);
                HttpResponse::build(status).json("Blocking operation error")
            }
            ApiError::PasswordError(e) => {
                error!("Password hashing failed: {:?}", e);
                HttpResponse::build(status).json("Internal server error")
            }
            ApiError::SessionError(_) | ApiError::MigrationError(_) => {
                error!("{}", self);
                HttpResponse::build(status).json("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn diesel_not_found_becomes_404() {
        let err = ApiError::from(diesel::result::Error::NotFound);
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_diesel_errors_are_internal() {
        let err = ApiError::from(diesel::result::Error::RollbackTransaction);
        assert!(matches!(err, ApiError::DatabaseError(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_are_unprocessable() {
        let err = ApiError::from(ValidationErrors::single("name", "must be given please"));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
