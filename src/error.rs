use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use tracing::{error, warn};

const RECORD_EXISTS: &str = "Record already exists";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    AuthError(#[from] AuthError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    /// Message safe to hand back to a client. Server-side failures are
    /// logged and replaced by a generic message.
    pub fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_)
            | AppError::ConfigError(_)
            | AppError::InternalError(_) => {
                error!("Request failed: {}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// Implement conversion from sqlx::Error
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::DatabaseError(DatabaseError::NotFound),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                warn!("Unique constraint rejected write: {}", db_err.message());
                AppError::Conflict(RECORD_EXISTS.to_string())
            }
            _ => AppError::DatabaseError(DatabaseError::QueryError(err.to_string())),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::DatabaseError(DatabaseError::MigrationError(err.to_string()))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthError(AuthError::TokenExpired)
            }
            _ => AppError::AuthError(AuthError::InvalidToken),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalError(format!("Password hashing failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Blocking task failed: {}", err))
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.public_message()
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(AuthError::UnknownUser) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unauthorized")]
    InvalidCredentials,

    #[error("User doesnt exist")]
    UnknownUser,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing authorization token")]
    MissingToken,

    #[error("Unauthorized")]
    Unauthorized,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Record not found")]
    NotFound,
}
