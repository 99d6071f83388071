//! Lambda function for forwarding structured log messages to the remote
//! aggregator.
//!
//! The request body must carry non-empty `message` and `log_level` string
//! fields; the whole body is then forwarded opaquely and the upstream
//! status is passed through to the caller.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tracing::{error, info};

use outbox_lambda_shared::{
    build_response, init_logger, init_tracing, log_message, post_log_entry, Config, LogLevel,
    ResponseEnvelope,
};

const BODY_REQUIRED: &str = "JSON body is required";
const BODY_INVALID: &str =
    "Unable to validate JSON body. JSON body must include a message and log_level.";

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = Config::from_env();
    init_logger(&config);

    let client = reqwest::Client::new();
    lambda_runtime::run(service_fn(move |event| {
        handler(event, config.clone(), client.clone())
    }))
    .await
}

/// Lambda handler invoked per request.
///
/// This endpoint deliberately keeps its own narrow validation instead of
/// the shared schema validator: it needs only two non-empty string fields
/// and a distinct fixed error body for each failure mode.
pub async fn handler(
    event: LambdaEvent<Value>,
    config: Config,
    client: reqwest::Client,
) -> Result<ResponseEnvelope, Error> {
    let request_id = event.context.request_id.clone();
    let body = event.payload;

    if body.is_null() || body.as_str().is_some_and(str::is_empty) {
        error!(request_id = %request_id, "log-message request had no body");
        log_message(BODY_REQUIRED, LogLevel::Error).await;
        return Ok(build_response(json!({"error": BODY_REQUIRED}), 400));
    }

    let message = body.get("message").and_then(Value::as_str).unwrap_or("");
    let log_level = body.get("log_level").and_then(Value::as_str).unwrap_or("");
    if message.is_empty() || log_level.is_empty() {
        error!(request_id = %request_id, "log-message request failed validation");
        log_message("Unable to validate JSON body", LogLevel::Error).await;
        return Ok(build_response(json!({"error": BODY_INVALID}), 400));
    }

    info!(request_id = %request_id, log_level = %log_level, "forwarding log entry");

    match post_log_entry(&client, &config, &body).await {
        Ok(status) => Ok(build_response(json!({"success": true}), status)),
        Err(e) => {
            let status = e.status().unwrap_or(400);
            error!(request_id = %request_id, error = %e, status, "failed to forward log entry");
            log_message(
                &format!("Failed to post to the log aggregator: {e}"),
                LogLevel::Error,
            )
            .await;
            Ok(build_response(json!({"success": false}), status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;
    use outbox_lambda_shared::test_utils::{log_request_body, stub_config};

    async fn invoke(payload: Value, config: Config) -> ResponseEnvelope {
        let event = LambdaEvent::new(payload, Context::default());
        handler(event, config, reqwest::Client::new())
            .await
            .expect("handler should succeed")
    }

    #[tokio::test]
    async fn null_body_returns_400_body_required() {
        let response = invoke(Value::Null, stub_config()).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": BODY_REQUIRED}));
    }

    #[tokio::test]
    async fn empty_string_body_returns_400_body_required() {
        let response = invoke(json!(""), stub_config()).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": BODY_REQUIRED}));
    }

    #[tokio::test]
    async fn empty_log_level_returns_400_fixed_error() {
        let mut body = log_request_body();
        body["log_level"] = json!("");

        let response = invoke(body, stub_config()).await;

        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": BODY_INVALID}));
    }

    #[tokio::test]
    async fn missing_message_returns_400_fixed_error() {
        let response = invoke(json!({"log_level": "info"}), stub_config()).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": BODY_INVALID}));
    }

    #[tokio::test]
    async fn non_string_message_returns_400_fixed_error() {
        let response =
            invoke(json!({"message": 42, "log_level": "info"}), stub_config()).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({"error": BODY_INVALID}));
    }
}
