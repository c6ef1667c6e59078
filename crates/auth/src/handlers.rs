use crate::{
    error::{AuthError, Result},
    extractor::AuthenticatedUser,
    jwt::JwtManager,
    oauth::{GoogleOAuthProvider, OAuthStateStore},
    password::PasswordHasher,
    repository::{PostgresUserRepository, ProfileUpdate, UserRepository},
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use cinelog_core::models::{User, UserResponse, PROVIDER_GOOGLE};
use cinelog_core::validation;
use cinelog_core::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Registration Handler
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

fn issue_token_pair(jwt_manager: &JwtManager, user: User) -> Result<TokenResponse> {
    let access_token =
        jwt_manager.create_access_token(user.id.to_string(), Some(user.email.clone()))?;
    let refresh_token =
        jwt_manager.create_refresh_token(user.id.to_string(), Some(user.email.clone()))?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: JwtManager::access_token_ttl(),
        user: user.into(),
    })
}

#[post("/api/v1/auth/register")]
pub async fn register(
    req: web::Json<RegisterRequest>,
    user_repo: web::Data<Arc<PostgresUserRepository>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
) -> Result<impl Responder> {
    validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;

    let country = req.country.as_deref().map(str::to_ascii_uppercase);
    if let Some(country) = &country {
        validation::validate_country_code(country)?;
    }

    // Name falls back to the email local part.
    let full_name = req
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            req.email
                .split('@')
                .next()
                .unwrap_or("User")
                .to_string()
        });

    let password_hasher = PasswordHasher::default();
    let password_hash = password_hasher.hash_password(&req.password)?;

    let user = user_repo
        .create_local_user(
            &req.email,
            &password_hash,
            &full_name,
            country.as_deref(),
            req.city.as_deref(),
        )
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered");

    let tokens = issue_token_pair(&jwt_manager, user)?;
    Ok(HttpResponse::Created().json(tokens))
}

// ============================================================================
// Login Handler
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[post("/api/v1/auth/login")]
pub async fn login(
    req: web::Json<LoginRequest>,
    user_repo: web::Data<Arc<PostgresUserRepository>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
) -> Result<impl Responder> {
    let user = user_repo.find_by_email(&req.email).await?.ok_or_else(|| {
        tracing::warn!(email = %req.email, "Login attempt for unknown email");
        AuthError::InvalidCredentials
    })?;

    // Social accounts have no password hash and cannot use this route.
    let password_hash = match &user.password_hash {
        Some(hash) => hash.clone(),
        None => return Err(AuthError::SocialAccount(user.auth_provider)),
    };

    let password_hasher = PasswordHasher::default();
    if !password_hasher.verify_password(&req.password, &password_hash)? {
        tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let tokens = issue_token_pair(&jwt_manager, user)?;
    Ok(HttpResponse::Ok().json(tokens))
}

// ============================================================================
// Token Refresh Handler
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[post("/api/v1/auth/refresh")]
pub async fn refresh(
    req: web::Json<RefreshRequest>,
    user_repo: web::Data<Arc<PostgresUserRepository>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
) -> Result<impl Responder> {
    let claims = jwt_manager.verify_refresh_token(&req.refresh_token)?;
    let user_id = claims.user_id()?;

    // The account may have been removed since the token was issued.
    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let access_token =
        jwt_manager.create_access_token(user.id.to_string(), Some(user.email))?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: JwtManager::access_token_ttl(),
    }))
}

// ============================================================================
// Logout Handler
// ============================================================================

#[post("/api/v1/auth/logout")]
pub async fn logout(user: AuthenticatedUser) -> Result<impl Responder> {
    // Tokens are stateless; the client discards its copy. Kept as an
    // endpoint so the frontend has a single call to end a session.
    tracing::info!(user_id = %user.user_id, "User logged out");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Logged out"
    })))
}

// ============================================================================
// Current User
// ============================================================================

#[get("/api/v1/auth/me")]
pub async fn me(
    user: AuthenticatedUser,
    user_repo: web::Data<Arc<PostgresUserRepository>>,
) -> Result<impl Responder> {
    let user = user_repo
        .find_by_id(user.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub statistics: crate::repository::UserStatistics,
}

#[get("/api/v1/users/me/profile")]
pub async fn get_profile(
    user: AuthenticatedUser,
    user_repo: web::Data<Arc<PostgresUserRepository>>,
) -> Result<impl Responder> {
    let record = user_repo
        .find_by_id(user.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    let statistics = user_repo.user_statistics(user.user_id).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: record.into(),
        statistics,
    }))
}

#[put("/api/v1/users/me/profile")]
pub async fn update_profile(
    user: AuthenticatedUser,
    req: web::Json<ProfileUpdate>,
    user_repo: web::Data<Arc<PostgresUserRepository>>,
) -> Result<impl Responder> {
    let mut update = req.into_inner();
    update.country = update.country.map(|c| c.to_ascii_uppercase());
    if let Some(country) = &update.country {
        validation::validate_country_code(country)?;
    }
    if let Some(full_name) = &update.full_name {
        if full_name.trim().is_empty() {
            return Err(AuthError::Validation("full_name must not be empty".into()));
        }
    }

    let updated = user_repo.update_profile(user.user_id, &update).await?;

    tracing::info!(user_id = %updated.id, "Profile updated");

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

// ============================================================================
// Google Sign-In
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub authorization_url: String,
}

#[get("/api/v1/auth/google")]
pub async fn google_authorize(
    provider: web::Data<Option<Arc<GoogleOAuthProvider>>>,
    states: web::Data<Arc<OAuthStateStore>>,
) -> Result<impl Responder> {
    let provider = provider
        .get_ref()
        .as_ref()
        .ok_or_else(|| AuthError::Config("Google sign-in is not configured".to_string()))?;

    let state = states.issue();
    let authorization_url = provider.generate_authorization_url(&state);

    Ok(HttpResponse::Ok().json(AuthorizeResponse { authorization_url }))
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[get("/api/v1/auth/google/callback")]
pub async fn google_callback(
    query: web::Query<GoogleCallbackQuery>,
    provider: web::Data<Option<Arc<GoogleOAuthProvider>>>,
    states: web::Data<Arc<OAuthStateStore>>,
    user_repo: web::Data<Arc<PostgresUserRepository>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
    service_config: web::Data<ServiceConfig>,
) -> Result<impl Responder> {
    let provider = provider
        .get_ref()
        .as_ref()
        .ok_or_else(|| AuthError::Config("Google sign-in is not configured".to_string()))?;

    if let Some(error) = &query.error {
        tracing::warn!(error = %error, "Google authorization denied");
        return Err(AuthError::Validation(format!(
            "Google authorization failed: {}",
            error
        )));
    }

    let state = query.state.as_deref().ok_or(AuthError::InvalidOAuthState)?;
    if !states.consume(state) {
        return Err(AuthError::InvalidOAuthState);
    }

    let code = query
        .code
        .as_deref()
        .ok_or_else(|| AuthError::Validation("Missing authorization code".to_string()))?;

    let token = provider.exchange_code(code).await?;
    let profile = provider.get_user_profile(&token.access_token).await?;

    if !profile.verified_email {
        return Err(AuthError::Validation(
            "Google account email is not verified".to_string(),
        ));
    }

    let full_name = GoogleOAuthProvider::display_name(&profile);

    // First sign-in creates the account; later sign-ins refresh name
    // and photo from Google. An existing password account with the
    // same email gets switched over to Google sign-in.
    let user = match user_repo.find_by_email(&profile.email).await? {
        Some(existing) => {
            if existing.auth_provider != PROVIDER_GOOGLE {
                tracing::warn!(
                    user_id = %existing.id,
                    from = %existing.auth_provider,
                    "Switching account to Google sign-in"
                );
            }
            user_repo
                .refresh_social_profile(
                    existing.id,
                    &full_name,
                    profile.picture.as_deref(),
                    PROVIDER_GOOGLE,
                )
                .await?
        }
        None => {
            let country = GoogleOAuthProvider::country_code(&profile);
            let user = user_repo
                .create_social_user(
                    &profile.email,
                    &full_name,
                    profile.picture.as_deref(),
                    &country,
                    "Unknown",
                    PROVIDER_GOOGLE,
                )
                .await?;
            tracing::info!(user_id = %user.id, "User created via Google sign-in");
            user
        }
    };

    let tokens = issue_token_pair(&jwt_manager, user)?;

    let redirect_url = format!(
        "{}/auth/callback?access_token={}&refresh_token={}",
        service_config.frontend_url.trim_end_matches('/'),
        urlencoding::encode(&tokens.access_token),
        urlencoding::encode(&tokens.refresh_token),
    );

    Ok(HttpResponse::Found()
        .append_header(("Location", redirect_url))
        .finish())
}

/// Register all auth routes on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(refresh)
        .service(logout)
        .service(me)
        .service(get_profile)
        .service(update_profile)
        .service(google_authorize)
        .service(google_callback);
}
