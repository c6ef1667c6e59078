//! Error types shared across Cinelog services

use actix_web::{HttpResponse, ResponseError};

pub type Result<T> = std::result::Result<T, CinelogError>;

#[derive(Debug, thiserror::Error)]
pub enum CinelogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for CinelogError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CinelogError::NotFound("record"),
            other => CinelogError::Database(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for CinelogError {
    fn from(err: anyhow::Error) -> Self {
        CinelogError::Internal(err.to_string())
    }
}

impl ResponseError for CinelogError {
    fn error_response(&self) -> HttpResponse {
        match self {
            CinelogError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "error_description": msg
            })),
            CinelogError::NotFound(entity) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "error_description": format!("{} not found", entity)
            })),
            CinelogError::Conflict(msg) => HttpResponse::Conflict().json(serde_json::json!({
                "error": "conflict",
                "error_description": msg
            })),
            CinelogError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "unauthorized",
                "error_description": "Authentication required"
            })),
            // Persistence and internal failures stay generic on the wire.
            CinelogError::Database(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "database_error",
                    "error_description": "Database operation failed"
                }))
            }
            CinelogError::Config(_) | CinelogError::Internal(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "error_description": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CinelogError::Validation("bad rating".into())
                .error_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CinelogError::NotFound("movie").error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CinelogError::Conflict("duplicate email".into())
                .error_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CinelogError::Unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CinelogError::Database("connection reset".into())
                .error_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: CinelogError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, CinelogError::NotFound(_)));
    }
}
