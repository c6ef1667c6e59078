//! Accounts and authentication for Cinelog
//!
//! Local email/password accounts hashed with Argon2id, stateless JWT
//! sessions (HS256 access/refresh pair), and a server-side Google
//! OAuth code flow. Handlers mount under `/api/v1/auth` and
//! `/api/v1/users/me`.

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod oauth;
pub mod password;
pub mod repository;

pub use error::{AuthError, Result};
pub use extractor::AuthenticatedUser;
pub use jwt::{Claims, JwtManager};
pub use oauth::{GoogleOAuthProvider, OAuthStateStore};
pub use password::PasswordHasher;
pub use repository::{PostgresUserRepository, ProfileUpdate, UserRepository, UserStatistics};
