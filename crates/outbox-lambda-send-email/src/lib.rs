//! Lambda function for sending transactional email.
//!
//! Validates the request body against the email schema, drives the shared
//! [`EmailClient`] through the provider send, and maps the outcome to a
//! uniform response envelope.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tracing::{error, info};

use outbox_lambda_shared::{
    build_error_response, build_response, init_logger, init_tracing, log_message, validate,
    Config, EmailClient, EmailMessage, LogLevel, ResponseEnvelope, Schema, ValidationResult,
};

/// Required fields for a send request.
fn email_schema() -> Schema {
    Schema::new()
        .required("to", "string|array")
        .required("to_name", "string|array")
        .required("from", "string")
        .required("from_name", "string")
        .required("subject", "string")
        .required("text", "string")
        .required("html", "string")
}

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = Config::from_env();
    init_logger(&config);

    lambda_runtime::run(service_fn(move |event| handler(event, config.clone()))).await
}

/// Lambda handler invoked per request.
pub async fn handler(
    event: LambdaEvent<Value>,
    config: Config,
) -> Result<ResponseEnvelope, Error> {
    let request_id = event.context.request_id.clone();
    let body = event.payload;

    if let ValidationResult::Invalid(validation_error) = validate(Some(&body), &email_schema()) {
        error!(
            request_id = %request_id,
            developer_message = %validation_error.developer_message,
            "send-email request failed validation"
        );
        log_message(&validation_error.developer_message, LogLevel::Error).await;
        return Ok(build_error_response(
            400,
            serde_json::to_value(&validation_error)?,
        ));
    }

    // Schema validation checks types, not structure; a recipient list with
    // malformed entries can still fail to decode here.
    let message: EmailMessage = match serde_json::from_value(body) {
        Ok(message) => message,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "failed to parse email message");
            return Ok(build_error_response(
                400,
                format!("Invalid request: {}", e),
            ));
        }
    };

    info!(request_id = %request_id, subject = %message.subject, "handling send-email request");

    let mut client = EmailClient::new(message, &config);
    client.send().await;

    if client.in_error() {
        let errors = serde_json::to_value(client.errors().unwrap_or(&[]))?;
        error!(
            request_id = %request_id,
            status = ?client.response_status(),
            "email send failed"
        );
        log_message("Failed to send email", LogLevel::Error).await;
        return Ok(build_error_response(400, errors));
    }

    info!(
        request_id = %request_id,
        status = ?client.response_status(),
        "email send accepted"
    );
    Ok(build_response(json!({"success": true}), 200))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;
    use outbox_lambda_shared::test_utils::{email_request_body, stub_config};
    use outbox_lambda_shared::VALIDATION_ERROR_CODE;

    async fn invoke(payload: Value, config: Config) -> ResponseEnvelope {
        let event = LambdaEvent::new(payload, Context::default());
        handler(event, config).await.expect("handler should succeed")
    }

    // ==================== Validation Path Tests ====================

    #[tokio::test]
    async fn missing_body_returns_400_with_field_listing() {
        let response = invoke(Value::Null, stub_config()).await;

        assert_eq!(response.status, 400);
        let message = &response.body["messages"][0];
        assert_eq!(message["error_code"], json!(VALIDATION_ERROR_CODE));
        assert!(message["developer_message"]
            .as_str()
            .unwrap()
            .contains("'to' (string or array)"));
    }

    #[tokio::test]
    async fn missing_subject_returns_400_naming_field() {
        let mut body = email_request_body();
        body.as_object_mut().unwrap().remove("subject");

        let response = invoke(body, stub_config()).await;

        assert_eq!(response.status, 400);
        let developer_message = response.body["messages"][0]["developer_message"]
            .as_str()
            .unwrap();
        assert!(developer_message.contains("'subject'"));
        assert!(developer_message.contains("string"));
    }

    #[tokio::test]
    async fn mistyped_to_returns_400() {
        let mut body = email_request_body();
        body["to"] = json!(42);

        let response = invoke(body, stub_config()).await;

        assert_eq!(response.status, 400);
        assert_eq!(response.body["status"], json!(400));
    }

    // ==================== Send Path Tests ====================

    #[tokio::test]
    async fn accepted_send_returns_200_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v3/mail/send")
            .with_status(202)
            .create_async()
            .await;

        let mut config = stub_config();
        config.sendgrid_api_base = server.url();

        let response = invoke(email_request_body(), config).await;

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"success": true}));
        assert_eq!(response.headers.content_type, "application/json");
    }

    #[tokio::test]
    async fn malformed_from_address_returns_400_with_message() {
        let mut body = email_request_body();
        body["from"] = json!("not an address");

        let response = invoke(body, stub_config()).await;

        assert_eq!(response.status, 400);
        let messages = response.body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0]["message"]
            .as_str()
            .unwrap()
            .contains("improperly formatted"));
    }

    #[tokio::test]
    async fn provider_rejection_returns_400_with_provider_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v3/mail/send")
            .with_status(400)
            .with_body(json!({"errors": [{"message": "bad sender", "field": "from"}]}).to_string())
            .create_async()
            .await;

        let mut config = stub_config();
        config.sendgrid_api_base = server.url();

        let response = invoke(email_request_body(), config).await;

        assert_eq!(response.status, 400);
        let messages = response.body["messages"].as_array().unwrap();
        assert_eq!(messages[0]["message"], json!("bad sender"));
        assert_eq!(messages[0]["field"], json!("from"));
    }
}
