//! Server-side OAuth 2.0 code flow.

pub mod google;
pub mod state;

pub use google::{GoogleOAuthProvider, GoogleTokenResponse, GoogleUserProfile};
pub use state::OAuthStateStore;
