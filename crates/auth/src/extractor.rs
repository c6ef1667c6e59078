use crate::error::AuthError;
use crate::jwt::JwtManager;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use std::sync::Arc;
use uuid::Uuid;

/// Identity of the caller, proven by a valid access token.
///
/// Extracting this from a request fails with 401 when the
/// Authorization header is missing, malformed, or carries an invalid
/// or expired token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let jwt_manager = req
        .app_data::<web::Data<Arc<JwtManager>>>()
        .ok_or_else(|| AuthError::Config("JwtManager not registered".to_string()))?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let token = JwtManager::extract_bearer_token(auth_header)?;
    let claims = jwt_manager.verify_access_token(token)?;

    Ok(AuthenticatedUser {
        user_id: claims.user_id()?,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App, HttpResponse};

    const TEST_SECRET: &[u8] = b"test-secret-that-is-32-bytes-long!!";

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "user_id": user.user_id }))
    }

    fn jwt_manager() -> web::Data<Arc<JwtManager>> {
        web::Data::new(Arc::new(JwtManager::new(TEST_SECRET).unwrap()))
    }

    #[actix_rt::test]
    async fn test_missing_header_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(jwt_manager())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_valid_access_token_accepted() {
        let manager = JwtManager::new(TEST_SECRET).unwrap();
        let user_id = Uuid::new_v4();
        let token = manager
            .create_access_token(user_id.to_string(), None)
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(jwt_manager())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_refresh_token_rejected_on_protected_route() {
        let manager = JwtManager::new(TEST_SECRET).unwrap();
        let token = manager
            .create_refresh_token(Uuid::new_v4().to_string(), None)
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(jwt_manager())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
