use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    cookies,
    extractors::AuthUser,
    password::{hash_password, verify_password},
};
use crate::error::ApiError;
use crate::profile::dto::{ChangePasswordRequest, UpdateProfileRequest};
use crate::response::Envelope;
use crate::state::AppState;
use crate::users::repo::{ProfileChanges, User};
use crate::users::validate;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).patch(update_profile))
        .route("/profile/changePassword", patch(change_password))
}

#[instrument(skip(user))]
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<Envelope<User>> {
    Envelope::ok("User Profile data fetched successfully", user)
}

#[instrument(skip(state, user, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Envelope<User>>, ApiError> {
    if let Some(field) = payload.blocked_field() {
        warn!(user_id = %user.id, field, "blocked field in profile update");
        return Err(ApiError::FieldNotUpdatable(field));
    }

    validate::validate_profile_update(&payload).map_err(ApiError::Validation)?;

    let changes = ProfileChanges {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        age: payload.age,
        gender: payload.gender,
        skills: payload.skills,
    };
    let updated = User::update_profile(&state.db, user.id, &changes).await?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Envelope::ok("User Profile updated successfully", updated))
}

#[instrument(skip(state, user, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<(HeaderMap, Json<Envelope<()>>), ApiError> {
    if !verify_password(&payload.old_password, &user.password_hash)? {
        warn!(user_id = %user.id, "change password with invalid old password");
        return Err(ApiError::InvalidCredentials);
    }

    validate::validate_new_password(&payload.new_password).map_err(ApiError::Validation)?;

    let password_hash = hash_password(&payload.new_password)?;
    User::update_password(&state.db, user.id, &password_hash).await?;

    // The session cookie is expired so the caller has to log in again.
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookies::expired_cookie())
            .context("build expired cookie header")?,
    );

    info!(user_id = %user.id, "password changed");
    Ok((
        headers,
        Envelope::message("Password changed successfully, please login again"),
    ))
}
