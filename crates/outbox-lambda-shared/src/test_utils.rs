//! Test utilities for Lambda handler testing.
//!
//! This module provides shared test infrastructure for the Lambda crates:
//! stub configurations pointed at local mock servers and canned request
//! bodies. Enable the `test-utils` feature to access it from dependent
//! crates.

use serde_json::{json, Value};

use crate::config::{Config, DEFAULT_SENDGRID_API_BASE};

/// Config with every remote endpoint pointed at unroutable defaults.
///
/// Tests override the endpoint they exercise (`sendgrid_api_base` or
/// `loggly_host`) with a mock server address. Constructing the config
/// directly avoids mutating the process environment, which keeps parallel
/// tests race-free.
pub fn stub_config() -> Config {
    Config {
        sendgrid_api_key: "SG.test-key".to_string(),
        sendgrid_api_base: DEFAULT_SENDGRID_API_BASE.to_string(),
        loggly_host: "127.0.0.1:1".to_string(),
        loggly_path: "inputs".to_string(),
        loggly_token: "test-token".to_string(),
        loggly_subdomain: "test".to_string(),
        loggly_tag: "outbox".to_string(),
        loggly_tag_env: "test".to_string(),
        is_dev: true,
    }
}

/// Create a mock request ID for testing.
///
/// Since `lambda_runtime::Context` is non-exhaustive and cannot be directly
/// constructed, tests should use the request ID directly for assertions.
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{}", suffix)
}

/// Complete, well-formed send-email request body.
pub fn email_request_body() -> Value {
    json!({
        "to": "buyer@example.com",
        "to_name": "Buyer",
        "from": "portal@example.com",
        "from_name": "Portal",
        "subject": "Welcome",
        "text": "Hello",
        "html": "<p>Hello</p>",
    })
}

/// Complete, well-formed log-message request body.
pub fn log_request_body() -> Value {
    json!({
        "message": "something happened",
        "log_level": "warn",
    })
}
