//! HTTP mapping for read-path failures.
//!
//! Store errors are logged in full and answered with a generic body so
//! no internals reach the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;

pub const NOT_FOUND_MESSAGE: &str = "The page you are looking for does not exist.";
pub const INTERNAL_MESSAGE: &str = "Something went wrong on our end. Please try again later.";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn not_found() -> Self {
        Self::new("NOT_FOUND", NOT_FOUND_MESSAGE)
    }

    pub fn internal() -> Self {
        Self::new("INTERNAL_ERROR", INTERNAL_MESSAGE)
    }

    fn new(code: &'static str, message: &str) -> Self {
        Self {
            error: ErrorDetail {
                code,
                message: message.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(detail) => {
                tracing::debug!(%detail, "resource not found");
                (StatusCode::NOT_FOUND, Json(ErrorBody::not_found())).into_response()
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal())).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = CatalogError::venue_not_found(99).into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "venue 99 not found"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let err: ApiError = CatalogError::Database(DbErr::Custom("connection reset".into())).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_is_generic() {
        let json = serde_json::to_value(ErrorBody::internal()).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"]["message"], INTERNAL_MESSAGE);
    }
}
