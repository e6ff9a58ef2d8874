use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::connections::dto::{ConnectionItem, FeedParams, ReceivedRequestItem};
use crate::connections::ledger;
use crate::connections::repo::ConnectionRequest;
use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;
use crate::users::dto::PublicProfile;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/request/send/:status/:user_id", post(send_request))
        .route("/request/review/:status/:request_id", patch(review_request))
        .route("/user/request/received", get(requests_received))
        .route("/user/connections", get(connections))
        .route("/user/feed", get(feed))
}

#[instrument(skip(state, user))]
pub async fn send_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((status, user_id)): Path<(String, String)>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let msg = ledger::send_request(&state.db, &user, &status, &user_id).await?;
    Ok(Envelope::message(msg))
}

#[instrument(skip(state, user))]
pub async fn review_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((status, request_id)): Path<(String, String)>,
) -> Result<Json<Envelope<ConnectionRequest>>, ApiError> {
    let request = ledger::review_request(&state.db, &user, &status, &request_id).await?;
    Ok(Envelope::ok(
        format!("Connection request {} successfully", request.status),
        request,
    ))
}

#[instrument(skip(state, user))]
pub async fn requests_received(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Envelope<Vec<ReceivedRequestItem>>>, ApiError> {
    let items = ledger::list_received(&state.db, &user).await?;
    Ok(Envelope::ok(
        "Fetched connection requests received successfully",
        items,
    ))
}

#[instrument(skip(state, user))]
pub async fn connections(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Envelope<Vec<ConnectionItem>>>, ApiError> {
    let items = ledger::list_connections(&state.db, &user).await?;
    Ok(Envelope::ok("Fetched all connections successfully", items))
}

/// The feed answers with the bare page of profiles, not the envelope.
#[instrument(skip(state, user))]
pub async fn feed(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<PublicProfile>>, ApiError> {
    let profiles = ledger::compute_feed(&state.db, &user, &params).await?;
    Ok(Json(profiles))
}
