use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// Status of a connection request. `interested`/`ignored` are the only
/// creation statuses; `accepted`/`rejected` are the only review targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Interested,
    Ignored,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "interested" => Some(Self::Interested),
            "ignored" => Some(Self::Ignored),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interested => "interested",
            Self::Ignored => "ignored",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Allowed when creating a request.
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Interested | Self::Ignored)
    }

    /// Allowed as the outcome of a review.
    pub fn is_decision(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed request between two users. `from_user_id`/`to_user_id` are
/// immutable once written; only `status` and `updated_at` ever change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: RequestStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const REQUEST_COLUMNS: &str = "id, from_user_id, to_user_id, status, created_at, updated_at";

/// Write one new request. The self-request invariant is re-checked here,
/// independent of whatever the caller already validated.
pub async fn insert(
    db: &PgPool,
    from_user_id: Uuid,
    to_user_id: Uuid,
    status: RequestStatus,
) -> Result<ConnectionRequest, ApiError> {
    if from_user_id == to_user_id {
        return Err(ApiError::SelfRequestForbidden);
    }
    let request = sqlx::query_as::<_, ConnectionRequest>(&format!(
        r#"
        INSERT INTO connection_requests (from_user_id, to_user_id, status)
        VALUES ($1, $2, $3)
        RETURNING {REQUEST_COLUMNS}
        "#
    ))
    .bind(from_user_id)
    .bind(to_user_id)
    .bind(status)
    .fetch_one(db)
    .await
    .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(request)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<ConnectionRequest>> {
    let request = sqlx::query_as::<_, ConnectionRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM connection_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(request)
}

pub async fn set_status(
    db: &PgPool,
    id: Uuid,
    status: RequestStatus,
) -> anyhow::Result<ConnectionRequest> {
    let request = sqlx::query_as::<_, ConnectionRequest>(&format!(
        r#"
        UPDATE connection_requests
        SET status = $2, updated_at = now()
        WHERE id = $1
        RETURNING {REQUEST_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .fetch_one(db)
    .await?;
    Ok(request)
}

/// Pending requests addressed to a user.
pub async fn list_received(db: &PgPool, to_user_id: Uuid) -> anyhow::Result<Vec<ConnectionRequest>> {
    let rows = sqlx::query_as::<_, ConnectionRequest>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM connection_requests
        WHERE to_user_id = $1 AND status = $2
        ORDER BY created_at DESC
        "#
    ))
    .bind(to_user_id)
    .bind(RequestStatus::Interested)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Accepted requests with the user on either side.
pub async fn list_accepted_touching(
    db: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Vec<ConnectionRequest>> {
    let rows = sqlx::query_as::<_, ConnectionRequest>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM connection_requests
        WHERE status = $2 AND (from_user_id = $1 OR to_user_id = $1)
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .bind(RequestStatus::Accepted)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Every request with the user on either side, regardless of status. Feeds
/// the exclusion set: ignored and rejected count as interacted too.
pub async fn list_touching(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ConnectionRequest>> {
    let rows = sqlx::query_as::<_, ConnectionRequest>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM connection_requests
        WHERE from_user_id = $1 OR to_user_id = $1
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
