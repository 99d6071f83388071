//! Uniform HTTP response envelopes for the Lambda handlers.
//!
//! Every handler outcome, success or failure, is expressed as a
//! [`ResponseEnvelope`]: status code, JSON body, and a `Content-Type:
//! application/json` header. Error envelopes carry the status alongside an
//! ordered `messages` array in the body.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Headers attached to every envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: String,
}

impl Default for ResponseHeaders {
    fn default() -> Self {
        Self {
            content_type: "application/json".to_string(),
        }
    }
}

/// Response envelope returned to the serverless gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    /// HTTP status code, passed through verbatim from the caller.
    pub status: u16,

    /// JSON response body.
    pub body: Value,

    /// Response headers; always `Content-Type: application/json`.
    pub headers: ResponseHeaders,
}

/// One or many error messages. A single message is normalized into a
/// one-element array by [`build_error_response`].
#[derive(Debug, Clone)]
pub enum Messages {
    One(Value),
    Many(Vec<Value>),
}

impl From<&str> for Messages {
    fn from(message: &str) -> Self {
        Self::One(Value::String(message.to_string()))
    }
}

impl From<String> for Messages {
    fn from(message: String) -> Self {
        Self::One(Value::String(message))
    }
}

impl From<Value> for Messages {
    fn from(message: Value) -> Self {
        match message {
            Value::Array(items) => Self::Many(items),
            other => Self::One(other),
        }
    }
}

impl From<Vec<Value>> for Messages {
    fn from(messages: Vec<Value>) -> Self {
        Self::Many(messages)
    }
}

impl Messages {
    fn into_array(self) -> Vec<Value> {
        match self {
            Self::One(message) => vec![message],
            Self::Many(messages) => messages,
        }
    }
}

/// Build a success envelope with the given body and status.
pub fn build_response(body: Value, status: u16) -> ResponseEnvelope {
    ResponseEnvelope {
        status,
        body,
        headers: ResponseHeaders::default(),
    }
}

/// Build an error envelope. The body carries the status code and the
/// normalized `messages` array, preserving caller-supplied order.
pub fn build_error_response(status: u16, messages: impl Into<Messages>) -> ResponseEnvelope {
    let body = json!({
        "status": status,
        "messages": messages.into().into_array(),
    });
    ResponseEnvelope {
        status,
        body,
        headers: ResponseHeaders::default(),
    }
}
