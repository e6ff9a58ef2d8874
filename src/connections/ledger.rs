use std::collections::{BTreeSet, HashMap};

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::connections::dto::{ConnectionItem, FeedParams, ReceivedRequestItem};
use crate::connections::repo::{self, ConnectionRequest, RequestStatus};
use crate::error::ApiError;
use crate::users::dto::PublicProfile;
use crate::users::repo::{self as users_repo, User};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Record one user's interest or disinterest in another.
///
/// `status_raw` and `to_user_raw` arrive straight from the URL path; both
/// are validated here before anything is looked up. Returns the
/// confirmation message for the response envelope.
pub async fn send_request(
    db: &PgPool,
    from_user: &User,
    status_raw: &str,
    to_user_raw: &str,
) -> Result<String, ApiError> {
    let status = RequestStatus::parse(status_raw)
        .filter(RequestStatus::is_initial)
        .ok_or_else(|| ApiError::StatusNotAllowed(status_raw.to_string()))?;

    let to_user_id = Uuid::parse_str(to_user_raw)
        .map_err(|_| ApiError::InvalidIdentifier(to_user_raw.to_string()))?;

    let to_user = User::find_by_id(db, to_user_id)
        .await?
        .ok_or(ApiError::ReceiverNotFound)?;

    if from_user.id == to_user.id {
        return Err(ApiError::SelfRequestForbidden);
    }

    // Repeated sends between the same pair are not deduplicated.
    let request = repo::insert(db, from_user.id, to_user.id, status).await?;

    info!(
        request_id = %request.id,
        from_user_id = %from_user.id,
        to_user_id = %to_user.id,
        status = %status,
        "connection request sent"
    );

    Ok(match status {
        RequestStatus::Interested => format!(
            "{} is interested in {}",
            from_user.first_name, to_user.first_name
        ),
        _ => format!(
            "{} has ignored {}",
            from_user.first_name, to_user.first_name
        ),
    })
}

/// Decide on a pending request. Only the recipient may review, and only
/// while the request is still `interested`.
pub async fn review_request(
    db: &PgPool,
    logged_in: &User,
    status_raw: &str,
    request_raw: &str,
) -> Result<ConnectionRequest, ApiError> {
    let status = RequestStatus::parse(status_raw)
        .filter(RequestStatus::is_decision)
        .ok_or_else(|| ApiError::StatusNotAllowed(status_raw.to_string()))?;

    let request_id = Uuid::parse_str(request_raw)
        .map_err(|_| ApiError::InvalidIdentifier(request_raw.to_string()))?;

    let request = repo::find_by_id(db, request_id)
        .await?
        .ok_or(ApiError::RequestNotFound)?;

    // NotRecipient wins over AlreadyDecided, whatever the current status.
    if request.to_user_id != logged_in.id {
        return Err(ApiError::NotRecipient);
    }

    if request.status != RequestStatus::Interested {
        return Err(ApiError::AlreadyDecided);
    }

    let updated = repo::set_status(db, request.id, status).await?;

    info!(
        request_id = %updated.id,
        reviewer_id = %logged_in.id,
        status = %status,
        "connection request reviewed"
    );

    Ok(updated)
}

/// Pending incoming requests with senders resolved to the safe projection.
pub async fn list_received(
    db: &PgPool,
    logged_in: &User,
) -> Result<Vec<ReceivedRequestItem>, ApiError> {
    let requests = repo::list_received(db, logged_in.id).await?;

    let sender_ids: Vec<Uuid> = requests
        .iter()
        .map(|r| r.from_user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let profiles = load_profile_map(db, &sender_ids).await?;

    Ok(requests
        .into_iter()
        .filter_map(|r| {
            let from_user = profiles.get(&r.from_user_id).cloned()?;
            Some(ReceivedRequestItem {
                id: r.id,
                from_user,
                status: r.status,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
        })
        .collect())
}

/// Accepted connections with both sides resolved.
pub async fn list_connections(
    db: &PgPool,
    logged_in: &User,
) -> Result<Vec<ConnectionItem>, ApiError> {
    let requests = repo::list_accepted_touching(db, logged_in.id).await?;

    let user_ids: Vec<Uuid> = requests
        .iter()
        .flat_map(|r| [r.from_user_id, r.to_user_id])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let profiles = load_profile_map(db, &user_ids).await?;

    Ok(requests
        .into_iter()
        .filter_map(|r| {
            let from_user = profiles.get(&r.from_user_id).cloned()?;
            let to_user = profiles.get(&r.to_user_id).cloned()?;
            Some(ConnectionItem {
                id: r.id,
                from_user,
                to_user,
                status: r.status,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
        })
        .collect())
}

/// One page of users the logged-in user has never interacted with.
pub async fn compute_feed(
    db: &PgPool,
    logged_in: &User,
    params: &FeedParams,
) -> Result<Vec<PublicProfile>, ApiError> {
    let page = resolve_page(params.page.as_deref());
    let limit = resolve_limit(params.limit.as_deref());
    let offset = (page - 1) * limit;

    let touched = repo::list_touching(db, logged_in.id).await?;
    let excluded = exclusion_set(&touched, logged_in.id);

    let rows = users_repo::feed_page(db, &excluded, limit, offset).await?;
    Ok(rows.into_iter().map(PublicProfile::from).collect())
}

/// Page number: 1 when absent, non-numeric or below 1.
pub fn resolve_page(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

/// Page size: 10 when absent, non-numeric or below 1; capped at 50.
pub fn resolve_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|l| *l >= 1)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT)
}

/// Every user id appearing on either side of the given requests, plus the
/// user's own id. Any status counts as already interacted.
pub fn exclusion_set(requests: &[ConnectionRequest], user_id: Uuid) -> Vec<Uuid> {
    let mut ids = BTreeSet::new();
    for request in requests {
        ids.insert(request.from_user_id);
        ids.insert(request.to_user_id);
    }
    ids.insert(user_id);
    ids.into_iter().collect()
}

async fn load_profile_map(
    db: &PgPool,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, PublicProfile>, ApiError> {
    let rows = users_repo::load_profiles(db, ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| (row.id, PublicProfile::from(row)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn request(from: Uuid, to: Uuid, status: RequestStatus) -> ConnectionRequest {
        ConnectionRequest {
            id: Uuid::new_v4(),
            from_user_id: from,
            to_user_id: to,
            status,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn page_defaults_and_floors() {
        assert_eq!(resolve_page(None), 1);
        assert_eq!(resolve_page(Some("3")), 3);
        assert_eq!(resolve_page(Some("abc")), 1);
        assert_eq!(resolve_page(Some("0")), 1);
        assert_eq!(resolve_page(Some("-2")), 1);
    }

    #[test]
    fn limit_defaults_floors_and_caps() {
        assert_eq!(resolve_limit(None), 10);
        assert_eq!(resolve_limit(Some("25")), 25);
        assert_eq!(resolve_limit(Some("abc")), 10);
        assert_eq!(resolve_limit(Some("0")), 10);
        assert_eq!(resolve_limit(Some("-5")), 10);
        assert_eq!(resolve_limit(Some("50")), 50);
        assert_eq!(resolve_limit(Some("100")), 50);
    }

    #[test]
    fn offset_arithmetic_matches_pagination() {
        let page = resolve_page(Some("3"));
        let limit = resolve_limit(Some("10"));
        assert_eq!((page - 1) * limit, 20);

        let page = resolve_page(Some("1"));
        assert_eq!((page - 1) * limit, 0);
    }

    #[test]
    fn exclusion_set_always_contains_self() {
        let me = Uuid::new_v4();
        assert_eq!(exclusion_set(&[], me), vec![me]);
    }

    #[test]
    fn exclusion_set_collects_both_sides_and_dedups() {
        let me = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let requests = vec![
            request(me, a, RequestStatus::Interested),
            request(b, me, RequestStatus::Ignored),
            request(me, a, RequestStatus::Interested),
        ];
        let excluded = exclusion_set(&requests, me);
        assert_eq!(excluded.len(), 3);
        for id in [me, a, b] {
            assert!(excluded.contains(&id));
        }
    }

    #[test]
    fn exclusion_set_counts_every_status_as_interacted() {
        let me = Uuid::new_v4();
        let others: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let requests: Vec<ConnectionRequest> = others
            .iter()
            .zip([
                RequestStatus::Interested,
                RequestStatus::Ignored,
                RequestStatus::Accepted,
                RequestStatus::Rejected,
            ])
            .map(|(other, status)| request(me, *other, status))
            .collect();
        let excluded = exclusion_set(&requests, me);
        for other in &others {
            assert!(excluded.contains(other));
        }
    }
}
