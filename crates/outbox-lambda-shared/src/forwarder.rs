//! Stateless forwarding of log entries to the remote aggregator.
//!
//! Posts a caller-supplied JSON body to the token-scoped Loggly endpoint
//! with the configured tag header. The outcome is an explicit result:
//! delivered status on success, [`ForwardError`] carrying the upstream
//! status (when one was received) on failure.

use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

/// Tag header attached to every forwarded event.
const TAG_HEADER: &str = "X-LOGGLY-TAG";

/// Failure to deliver a log entry to the aggregator.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The aggregator responded with a non-2xx status.
    #[error("log aggregator returned status {status}")]
    Upstream { status: u16 },

    /// The request never produced an upstream response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ForwardError {
    /// Upstream status associated with this failure, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Whether a status code counts as a successful delivery.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Aggregator URL built from the configured host, path, and token segments.
fn aggregator_url(config: &Config) -> String {
    format!(
        "http://{}/{}/{}",
        config.loggly_host, config.loggly_path, config.loggly_token
    )
}

/// POST `body` to the aggregator. Returns the delivered 2xx status, or a
/// [`ForwardError`] for a non-2xx response or a transport failure.
pub async fn post_log_entry(
    client: &reqwest::Client,
    config: &Config,
    body: &Value,
) -> Result<u16, ForwardError> {
    let response = client
        .post(aggregator_url(config))
        .header(TAG_HEADER, config.loggly_tags())
        .json(body)
        .send()
        .await?;

    let status = response.status().as_u16();
    if is_success(status) {
        Ok(status)
    } else {
        Err(ForwardError::Upstream { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SENDGRID_API_BASE;
    use serde_json::json;

    fn test_config(host: &str) -> Config {
        Config {
            sendgrid_api_key: String::new(),
            sendgrid_api_base: DEFAULT_SENDGRID_API_BASE.to_string(),
            loggly_host: host.to_string(),
            loggly_path: "inputs".to_string(),
            loggly_token: "tok-123".to_string(),
            loggly_subdomain: String::new(),
            loggly_tag: "portal".to_string(),
            loggly_tag_env: "prod".to_string(),
            is_dev: false,
        }
    }

    #[test]
    fn is_success_accepts_only_2xx() {
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(is_success(299));
        assert!(!is_success(199));
        assert!(!is_success(300));
        assert!(!is_success(400));
        assert!(!is_success(500));
    }

    #[test]
    fn url_combines_host_path_and_token() {
        let config = test_config("logs.example.com");
        assert_eq!(
            aggregator_url(&config),
            "http://logs.example.com/inputs/tok-123"
        );
    }

    #[tokio::test]
    async fn delivered_entry_returns_upstream_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/inputs/tok-123")
            .match_header(TAG_HEADER, "portal,prod")
            .with_status(200)
            .create_async()
            .await;

        let config = test_config(&server.host_with_port());
        let client = reqwest::Client::new();
        let status = post_log_entry(&client, &config, &json!({"message": "hi"}))
            .await
            .expect("delivery succeeds");

        mock.assert_async().await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn non_2xx_response_is_upstream_error_with_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/inputs/tok-123")
            .with_status(503)
            .create_async()
            .await;

        let config = test_config(&server.host_with_port());
        let client = reqwest::Client::new();
        let err = post_log_entry(&client, &config, &json!({"message": "hi"}))
            .await
            .expect_err("delivery fails");

        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn connection_failure_carries_no_status() {
        let config = test_config("127.0.0.1:1");
        let client = reqwest::Client::new();
        let err = post_log_entry(&client, &config, &json!({"message": "hi"}))
            .await
            .expect_err("connection refused");

        assert!(err.status().is_none());
        assert!(matches!(err, ForwardError::Transport(_)));
    }
}
