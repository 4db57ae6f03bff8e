use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid or expired token")]
    InvalidSession,

    #[error("User not found")]
    UnknownUser,

    #[error("Admin access required")]
    AdminRequired,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid or expired token")]
    InvalidMagicToken,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Json(#[from] JsonRejection),

    #[error("{0}")]
    Query(#[from] QueryRejection),

    #[error("{0}")]
    Path(#[from] PathRejection),

    #[error("Database error: {0}")]
    Database(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Email delivery failed: {0}")]
    Email(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotAuthenticated | AppError::InvalidSession | AppError::UnknownUser => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AdminRequired => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidMagicToken | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Json(rejection) => rejection.status(),
            AppError::Query(rejection) => rejection.status(),
            AppError::Path(rejection) => rejection.status(),
            AppError::Email(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            _ if status.is_server_error() => {
                error!("{self}");
                "Internal server error".to_string()
            }
            AppError::Json(rejection) => rejection.body_text(),
            AppError::Query(rejection) => rejection.body_text(),
            AppError::Path(rejection) => rejection.body_text(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
