//! Environment-driven configuration for the outbox Lambda functions.
//!
//! All recognized settings are read once into a [`Config`] snapshot at
//! process start and injected into the components that need them. Tests
//! construct `Config` directly instead of mutating the process environment,
//! which keeps parallel test runs race-free.

use std::env;

/// SendGrid API key.
pub const SENDGRID_API_KEY_ENV: &str = "SENDGRID_API_KEY";
/// Loggly host for the raw event-forwarding endpoint (no scheme).
pub const LOGGLY_URL_ENV: &str = "LOGGLY_URL";
/// Path segment of the Loggly event-forwarding endpoint.
pub const LOGGLY_URI_ENV: &str = "LOGGLY_URI";
/// Loggly customer token.
pub const LOGGLY_TOKEN_ENV: &str = "LOGGLY_TOKEN";
/// Loggly account subdomain (remote logger sink).
pub const LOGGLY_SUBDOMAIN_ENV: &str = "LOGGLY_SUBDOMAIN";
/// Primary tag attached to forwarded events and remote log lines.
pub const LOGGLY_TAG_ENV: &str = "LOGGLY_TAG";
/// Environment tag (e.g. `dev`, `prod`) appended after the primary tag.
pub const LOGGLY_TAG_ENV_ENV: &str = "LOGGLY_TAG_ENV";
/// When set to `true`, enables development mode: sandboxed email sends and
/// console-only logging.
pub const IS_DEV_ENV: &str = "IS_DEV";

/// Default SendGrid API origin. Overridable per-`Config` for tests.
pub const DEFAULT_SENDGRID_API_BASE: &str = "https://api.sendgrid.com";

/// Snapshot of all environment-driven settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// SendGrid API key used as a bearer token.
    pub sendgrid_api_key: String,

    /// Origin of the SendGrid API. Defaults to the real endpoint; tests
    /// point this at a stub server.
    pub sendgrid_api_base: String,

    /// Host of the Loggly event-forwarding endpoint (no scheme).
    pub loggly_host: String,

    /// Path segment of the Loggly event-forwarding endpoint.
    pub loggly_path: String,

    /// Loggly customer token.
    pub loggly_token: String,

    /// Loggly account subdomain used by the remote logger sink.
    pub loggly_subdomain: String,

    /// Primary tag for forwarded events and remote log lines.
    pub loggly_tag: String,

    /// Environment tag appended after the primary tag.
    pub loggly_tag_env: String,

    /// Development mode: sandboxed sends, console-only logging.
    pub is_dev: bool,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// Missing variables resolve to empty strings rather than errors; the
    /// components that need a value surface its absence at the point of use
    /// (a Lambda with a misconfigured environment should still return an
    /// HTTP error envelope, not fail to start).
    pub fn from_env() -> Self {
        Self {
            sendgrid_api_key: env_or_default(SENDGRID_API_KEY_ENV),
            sendgrid_api_base: DEFAULT_SENDGRID_API_BASE.to_string(),
            loggly_host: env_or_default(LOGGLY_URL_ENV),
            loggly_path: env_or_default(LOGGLY_URI_ENV),
            loggly_token: env_or_default(LOGGLY_TOKEN_ENV),
            loggly_subdomain: env_or_default(LOGGLY_SUBDOMAIN_ENV),
            loggly_tag: env_or_default(LOGGLY_TAG_ENV),
            loggly_tag_env: env_or_default(LOGGLY_TAG_ENV_ENV),
            is_dev: env::var(IS_DEV_ENV).is_ok_and(|v| v == "true"),
        }
    }

    /// Comma-joined tag pair used for the `X-LOGGLY-TAG` header and the
    /// remote sink's tag path segment.
    pub fn loggly_tags(&self) -> String {
        format!("{},{}", self.loggly_tag, self.loggly_tag_env)
    }
}

fn env_or_default(name: &str) -> String {
    env::var(name).unwrap_or_default()
}
