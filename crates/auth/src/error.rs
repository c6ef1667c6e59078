use actix_web::{HttpResponse, ResponseError};

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Account uses {0} sign-in")]
    SocialAccount(String),

    #[error("Invalid OAuth state")]
    InvalidOAuthState,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AuthError::InvalidToken(err.to_string())
    }
}

impl From<cinelog_core::CinelogError> for AuthError {
    fn from(err: cinelog_core::CinelogError) -> Self {
        match err {
            cinelog_core::CinelogError::Validation(msg) => AuthError::Validation(msg),
            cinelog_core::CinelogError::Unauthorized => AuthError::Unauthorized,
            cinelog_core::CinelogError::Database(msg) => AuthError::Database(msg),
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_credentials",
                "error_description": "Invalid email or password"
            })),
            AuthError::InvalidToken(_) | AuthError::TokenExpired => HttpResponse::Unauthorized()
                .json(serde_json::json!({
                    "error": "invalid_token",
                    "error_description": self.to_string()
                })),
            AuthError::EmailTaken => HttpResponse::Conflict().json(serde_json::json!({
                "error": "email_taken",
                "error_description": "An account with this email already exists"
            })),
            AuthError::SocialAccount(provider) => {
                HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "social_login_required",
                    "error_description": format!("Please log in with {}", provider)
                }))
            }
            AuthError::InvalidOAuthState => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_request",
                "error_description": "Unknown or expired OAuth state"
            })),
            AuthError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "unauthorized",
                "error_description": "Authentication required"
            })),
            AuthError::UserNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "user_not_found",
                "error_description": "User not found"
            })),
            AuthError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "error_description": msg
            })),
            AuthError::Database(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "server_error",
                    "error_description": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        use actix_web::http::StatusCode;

        assert_eq!(
            AuthError::InvalidCredentials.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::EmailTaken.error_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::Validation("bad".into()).error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Database("boom".into()).error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_sqlx_error_maps_to_database() {
        let err: AuthError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AuthError::Database(_)));
    }
}
