use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::response::Envelope;
use crate::users::validate::Violations;

/// Every declared failure renders as HTTP 400 with the response envelope;
/// no other error status codes are used.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Auth token is required")]
    MissingToken,

    #[error("Invalid or expired auth token")]
    InvalidToken,

    #[error("No user found for auth token")]
    UnknownUser,

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("{0}")]
    Validation(Violations),

    #[error("Field '{0}' is not allowed in update")]
    FieldNotUpdatable(&'static str),

    #[error("'{0}' is not a valid id")]
    InvalidIdentifier(String),

    #[error("Status '{0}' is not allowed to be sent")]
    StatusNotAllowed(String),

    #[error("Receiver user does not exist")]
    ReceiverNotFound,

    #[error("You cannot send a request to yourself")]
    SelfRequestForbidden,

    #[error("Connection request does not exist")]
    RequestNotFound,

    #[error("Only the receiver can review this request")]
    NotRecipient,

    #[error("Request has already been decided")]
    AlreadyDecided,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (msg, detail) = match &self {
            // Logged with the message; the raw message is surfaced to the
            // client in the `error` field, the generic msg stays stable.
            ApiError::Internal(e) => {
                error!(error = %e, "request failed");
                ("Internal server error".to_string(), e.to_string())
            }
            other => (other.to_string(), other.to_string()),
        };

        (
            StatusCode::BAD_REQUEST,
            Json(Envelope::failure(msg, detail)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_failures_are_bad_request() {
        for err in [
            ApiError::MissingToken,
            ApiError::InvalidCredentials,
            ApiError::SelfRequestForbidden,
            ApiError::NotRecipient,
            ApiError::Internal(anyhow::anyhow!("boom")),
        ] {
            let res = err.into_response();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn login_failure_message_is_generic() {
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid Credentials");
    }

    #[test]
    fn status_not_allowed_names_the_status() {
        let err = ApiError::StatusNotAllowed("accepted".into());
        assert!(err.to_string().contains("accepted"));
    }
}
