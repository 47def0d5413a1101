// src/message.rs
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Location sent when the user leaves the field blank.
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub customer_id: String,
    pub location: String,
}

impl ChatRequest {
    /// Build a request from raw field values. The message is expected to be
    /// trimmed already; the location is trimmed here and defaulted.
    pub fn new(message: impl Into<String>, customer_id: impl Into<String>, location: &str) -> Self {
        Self {
            message: message.into(),
            customer_id: customer_id.into(),
            location: normalize_location(location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

impl ChatResponse {
    /// Decode a response body. A body that is valid JSON but has no string
    /// `reply` is reported as [`ChatError::MissingReply`].
    pub fn from_slice(body: &[u8]) -> Result<Self, ChatError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        match value.get("reply").and_then(|r| r.as_str()) {
            Some(reply) => Ok(Self { reply: reply.to_string() }),
            None => Err(ChatError::MissingReply),
        }
    }
}

pub fn normalize_location(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_location_becomes_unknown() {
        assert_eq!(normalize_location(""), "Unknown");
        assert_eq!(normalize_location("   \t"), "Unknown");
        assert_eq!(normalize_location("  Pune, India "), "Pune, India");
    }

    #[test]
    fn request_serializes_with_wire_field_names() {
        let req = ChatRequest::new("hi", "CUST-001", "");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "hi",
                "customer_id": "CUST-001",
                "location": "Unknown",
            })
        );
    }

    #[test]
    fn response_without_reply_is_rejected() {
        let err = ChatResponse::from_slice(br#"{"detail": "oops"}"#).unwrap_err();
        assert!(matches!(err, ChatError::MissingReply));

        let err = ChatResponse::from_slice(br#"{"reply": 42}"#).unwrap_err();
        assert!(matches!(err, ChatError::MissingReply));

        let err = ChatResponse::from_slice(b"<html>").unwrap_err();
        assert!(matches!(err, ChatError::Decode(_)));
    }

    #[test]
    fn response_extra_fields_are_ignored() {
        let body = br#"{"reply": "Hello!", "intent": "chit_chat"}"#;
        let resp = ChatResponse::from_slice(body).unwrap();
        assert_eq!(resp.reply, "Hello!");
    }
}
