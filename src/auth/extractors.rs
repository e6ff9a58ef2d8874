use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::{cookies, jwt::JwtKeys};
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::User;

/// Authorization gate: resolves the `token` cookie to the logged-in user.
/// The resolved user is handed to the handler by value; nothing is attached
/// to shared request state. The token itself is never logged.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            cookies::token_from_headers(&parts.headers).ok_or(ApiError::MissingToken)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            warn!("auth token failed verification");
            ApiError::InvalidToken
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "auth token for unknown user");
                ApiError::UnknownUser
            })?;

        Ok(AuthUser(user))
    }
}
