use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap, HeaderValue},
    routing::post,
    Json, Router,
};
use anyhow::Context;
use tracing::{info, instrument, warn};

use crate::auth::{
    cookies,
    dto::{LoginRequest, SignupRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
};
use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;
use crate::users::repo::{NewUser, User};
use crate::users::validate;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<Json<Envelope<User>>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    validate::validate_signup(&payload).map_err(ApiError::Validation)?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &NewUser {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password_hash,
            phone: payload.phone,
            age: payload.age,
            gender: payload.gender,
            skills: payload.skills.unwrap_or_default(),
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(Envelope::ok("User Signed Up successfully", user))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<Envelope<String>>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password answer identically.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!("login with unknown email");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookies::session_cookie(&token))
            .context("build session cookie header")?,
    );

    info!(user_id = %user.id, "user logged in");
    Ok((
        headers,
        Envelope::ok("User Logged In successfully", user.email),
    ))
}
