use crate::error::{AuthError, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_TTL: i64 = 3600; // 1 hour
const REFRESH_TOKEN_TTL: i64 = 7 * 24 * 3600; // 7 days

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub email: Option<String>,
    pub iat: i64,           // Issued at
    pub exp: i64,           // Expiration
    pub jti: String,        // JWT ID (unique identifier)
    pub token_type: String, // "access" or "refresh"
}

impl Claims {
    pub fn new_access_token(user_id: String, email: Option<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id,
            email,
            iat: now,
            exp: now + ACCESS_TOKEN_TTL,
            jti: Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
        }
    }

    pub fn new_refresh_token(user_id: String, email: Option<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id,
            email,
            iat: now,
            exp: now + REFRESH_TOKEN_TTL,
            jti: Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }

    pub fn validate_type(&self, expected_type: &str) -> Result<()> {
        if self.token_type != expected_type {
            return Err(AuthError::InvalidToken(format!(
                "Expected {} token, got {}",
                expected_type, self.token_type
            )));
        }
        Ok(())
    }

    /// Parse the subject as a user id.
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AuthError::InvalidToken("Subject is not a user ID".to_string()))
    }
}

/// JWT Manager using HS256 (shared-secret signing)
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.len() < 32 {
            return Err(AuthError::Config(
                "JWT secret must be at least 32 bytes".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::Config("JWT_SECRET not set".to_string()))?;
        Self::new(secret.as_bytes())
    }

    /// Generate access token
    pub fn create_access_token(&self, user_id: String, email: Option<String>) -> Result<String> {
        let claims = Claims::new_access_token(user_id, email);
        self.encode_token(&claims)
    }

    /// Generate refresh token
    pub fn create_refresh_token(&self, user_id: String, email: Option<String>) -> Result<String> {
        let claims = Claims::new_refresh_token(user_id, email);
        self.encode_token(&claims)
    }

    fn encode_token(&self, claims: &Claims) -> Result<String> {
        let header = Header::new(Algorithm::HS256);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode JWT: {}", e)))
    }

    /// Verify and decode JWT
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        // Additional expiration check
        if token_data.claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }

    /// Verify access token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        let claims = self.verify_token(token)?;
        claims.validate_type("access")?;
        Ok(claims)
    }

    /// Verify refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims> {
        let claims = self.verify_token(token)?;
        claims.validate_type("refresh")?;
        Ok(claims)
    }

    /// Extract token from Authorization header
    pub fn extract_bearer_token(auth_header: &str) -> Result<&str> {
        if !auth_header.starts_with("Bearer ") {
            return Err(AuthError::InvalidToken("Missing Bearer prefix".to_string()));
        }

        Ok(&auth_header[7..])
    }

    /// Seconds an access token stays valid; mirrored in login responses.
    pub fn access_token_ttl() -> i64 {
        ACCESS_TOKEN_TTL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"test-secret-that-is-32-bytes-long!!";

    #[test]
    fn test_jwt_creation_and_verification() {
        let manager = JwtManager::new(TEST_SECRET).unwrap();
        let user_id = Uuid::new_v4();

        let token = manager
            .create_access_token(user_id.to_string(), Some("user@example.com".to_string()))
            .unwrap();

        let claims = manager.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let manager = JwtManager::new(TEST_SECRET).unwrap();
        let token = manager
            .create_refresh_token(Uuid::new_v4().to_string(), None)
            .unwrap();

        assert!(manager.verify_access_token(&token).is_err());
        assert!(manager.verify_refresh_token(&token).is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(JwtManager::new(b"too-short").is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let header = "Bearer abc123";
        let token = JwtManager::extract_bearer_token(header).unwrap();
        assert_eq!(token, "abc123");

        let invalid_header = "abc123";
        assert!(JwtManager::extract_bearer_token(invalid_header).is_err());
    }
}
