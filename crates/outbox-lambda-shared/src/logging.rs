//! Process-wide logging facade with console and remote sinks.
//!
//! The [`Logger`] is constructed explicitly from the process [`Config`] at
//! startup via [`init_logger`] and reused for the process lifetime. The
//! console sink (dispatching through `tracing`) is always active; outside
//! development mode a remote Loggly sink additionally receives events at
//! `warn` severity and above.
//!
//! Remote delivery is fire-and-forget: sink failures are reported to the
//! console sink only and never surfaced to callers.

use std::sync::OnceLock;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::config::Config;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level tag. Unrecognized values fall back to `Info`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Remote Loggly sink: event endpoint plus the minimum severity it accepts.
struct RemoteSink {
    client: reqwest::Client,
    endpoint: String,
    min_level: LogLevel,
}

/// Logging facade holding the configured sink set.
pub struct Logger {
    remote: Option<RemoteSink>,
}

impl Logger {
    /// Build the sink set from configuration. In development mode only the
    /// console sink is active; otherwise a remote sink filtered to `warn`
    /// and above is added.
    pub fn new(config: &Config) -> Self {
        let remote = if config.is_dev {
            None
        } else {
            Some(RemoteSink {
                client: reqwest::Client::new(),
                endpoint: remote_endpoint(config),
                min_level: LogLevel::Warn,
            })
        };
        Self { remote }
    }

    /// Log a message at the given level.
    ///
    /// Returns `false` without logging when the message is empty. Remote
    /// delivery failures are reported to the console sink only.
    pub async fn log(&self, message: &str, level: LogLevel) -> bool {
        if message.is_empty() {
            return false;
        }

        match level {
            LogLevel::Info => info!("{}", message),
            LogLevel::Warn => warn!("{}", message),
            LogLevel::Error => error!("{}", message),
        }

        if let Some(remote) = &self.remote {
            if level >= remote.min_level {
                let event = json!({
                    "message": message,
                    "level": level.as_str(),
                });
                let result = remote
                    .client
                    .post(&remote.endpoint)
                    .json(&event)
                    .send()
                    .await;
                if let Err(e) = result {
                    debug!(error = %e, "remote log sink delivery failed");
                }
            }
        }

        true
    }
}

/// Loggly event endpoint scoped to the configured token and tags.
fn remote_endpoint(config: &Config) -> String {
    format!(
        "https://{}.loggly.com/inputs/{}/tag/{}/",
        config.loggly_subdomain,
        config.loggly_token,
        config.loggly_tags()
    )
}

/// Construct the process-wide logger from configuration.
///
/// The first call wins; later calls return the already-constructed logger,
/// preserving construct-once semantics across warm invocations.
pub fn init_logger(config: &Config) -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(config))
}

/// Log through the process-wide logger.
///
/// Returns `false` without logging when [`init_logger`] has not been called
/// yet or the message is empty.
pub async fn log_message(message: &str, level: LogLevel) -> bool {
    match LOGGER.get() {
        Some(logger) => logger.log(message, level).await,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SENDGRID_API_BASE;

    fn dev_config() -> Config {
        Config {
            sendgrid_api_key: String::new(),
            sendgrid_api_base: DEFAULT_SENDGRID_API_BASE.to_string(),
            loggly_host: String::new(),
            loggly_path: String::new(),
            loggly_token: "tok-123".to_string(),
            loggly_subdomain: "acme".to_string(),
            loggly_tag: "portal".to_string(),
            loggly_tag_env: "dev".to_string(),
            is_dev: true,
        }
    }

    #[test]
    fn level_parse_falls_back_to_info() {
        assert_eq!(LogLevel::parse("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::parse("error"), LogLevel::Error);
        assert_eq!(LogLevel::parse("info"), LogLevel::Info);
        assert_eq!(LogLevel::parse("silly"), LogLevel::Info);
        assert_eq!(LogLevel::parse(""), LogLevel::Info);
    }

    #[test]
    fn dev_mode_has_no_remote_sink() {
        let logger = Logger::new(&dev_config());
        assert!(logger.remote.is_none());
    }

    #[test]
    fn production_mode_adds_warn_filtered_remote_sink() {
        let config = Config {
            is_dev: false,
            ..dev_config()
        };
        let logger = Logger::new(&config);
        let remote = logger.remote.as_ref().expect("remote sink");
        assert_eq!(remote.min_level, LogLevel::Warn);
        assert_eq!(
            remote.endpoint,
            "https://acme.loggly.com/inputs/tok-123/tag/portal,dev/"
        );
    }

    #[tokio::test]
    async fn empty_message_returns_false() {
        let logger = Logger::new(&dev_config());
        assert!(!logger.log("", LogLevel::Info).await);
    }

    #[tokio::test]
    async fn console_only_log_returns_true() {
        let logger = Logger::new(&dev_config());
        assert!(logger.log("hello", LogLevel::Error).await);
    }
}
