use axum::Json;
use serde::Serialize;

/// Uniform response body: `{ msg, error, data }`. Every route except the
/// feed wraps its payload in this shape.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub msg: String,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(msg: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            msg: msg.into(),
            error: None,
            data: Some(data),
        })
    }
}

impl Envelope<()> {
    /// Success with no payload; `data` renders as null.
    pub fn message(msg: impl Into<String>) -> Json<Self> {
        Json(Self {
            msg: msg.into(),
            error: None,
            data: None,
        })
    }

    pub fn failure(msg: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            error: Some(error.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_has_null_error() {
        let Json(env) = Envelope::ok("done", serde_json::json!({"k": 1}));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["msg"], "done");
        assert_eq!(json["error"], serde_json::Value::Null);
        assert_eq!(json["data"]["k"], 1);
    }

    #[test]
    fn message_envelope_has_null_data() {
        let Json(env) = Envelope::message("sent");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["msg"], "sent");
        assert_eq!(json["error"], serde_json::Value::Null);
        assert_eq!(json["data"], serde_json::Value::Null);
    }

    #[test]
    fn failure_envelope_carries_error() {
        let env = Envelope::failure("nope", "bad input");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["msg"], "nope");
        assert_eq!(json["error"], "bad input");
        assert_eq!(json["data"], serde_json::Value::Null);
    }
}
