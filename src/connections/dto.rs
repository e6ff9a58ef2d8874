use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::connections::repo::RequestStatus;
use crate::users::dto::PublicProfile;

/// A pending incoming request with the sender resolved to the safe
/// projection.
#[derive(Debug, Serialize)]
pub struct ReceivedRequestItem {
    pub id: Uuid,
    pub from_user: PublicProfile,
    pub status: RequestStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// An accepted connection with both sides resolved.
#[derive(Debug, Serialize)]
pub struct ConnectionItem {
    pub id: Uuid,
    pub from_user: PublicProfile,
    pub to_user: PublicProfile,
    pub status: RequestStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Raw feed query params. Kept as strings so a non-numeric value falls back
/// to the default instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}
