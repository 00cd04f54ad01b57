// handlers/public/auth/mod.rs - token acquisition
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, Claims};
use crate::database::User;
use crate::error::ApiError;
use crate::state::AppState;

pub mod login;
pub mod register;

pub use login::login_post;
pub use register::register_post;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user_role: String,
}

/// Sign a bearer token for `user` with the configured lifetime.
pub(crate) fn issue_token(state: &AppState, user: &User) -> Result<TokenResponse, ApiError> {
    let security = &state.config.security;
    let claims = Claims::new(&user.email, &user.role, security.jwt_expiry_minutes);
    let access_token = generate_jwt(&claims, &security.jwt_secret)?;

    Ok(TokenResponse {
        access_token,
        token_type: "bearer",
        user_role: user.role.clone(),
    })
}
