//! SendGrid email client with accumulated error state.
//!
//! [`EmailClient`] wraps one [`EmailMessage`]: it validates the addresses,
//! checks that every required field is present, builds the provider payload
//! (sandboxed in development mode), performs the send, and records every
//! failure into an error list the handler turns into a 400 response.
//!
//! The error list uses an `Option` sentinel: `None` means no errors have
//! been recorded, which is distinct from an explicitly stored empty list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;

/// SendGrid v3 mail send path, appended to the configured API base.
const MAIL_SEND_PATH: &str = "/v3/mail/send";

/// RFC-5322-lite address pattern: unquoted local part without
/// `<>()[]\.,;:@"` (optionally dotted) or a quoted string, then `@`, then a
/// bracketed IPv4 literal or a dotted hostname ending in a two-or-more
/// letter label. Matched against the lowercased address.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern compiles")
});

/// Check an address against the standard pattern, case-insensitively.
pub fn is_email_address(address: &str) -> bool {
    EMAIL_PATTERN.is_match(&address.to_lowercase())
}

/// A single recipient entry in list form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipient {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `to` field: a bare address or an ordered recipient list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AddressField {
    Single(String),
    List(Vec<Recipient>),
}

/// `to_name` field: a single display name or a list of names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NameField {
    Single(String),
    Many(Vec<String>),
}

impl NameField {
    /// Display name used when normalizing a single-address `to`.
    fn primary(&self) -> Option<String> {
        match self {
            Self::Single(name) => Some(name.clone()),
            Self::Many(names) => names.first().cloned(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Single(name) => name.is_empty(),
            Self::Many(names) => names.is_empty(),
        }
    }
}

/// Structured email message accepted by the send-email endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    pub to: AddressField,
    pub to_name: NameField,
    pub from: String,
    pub from_name: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EmailMessage {
    /// Normalized recipient list for the provider payload: a single string
    /// address becomes a one-element list carrying the display name; a list
    /// passes through unchanged.
    fn recipients(&self) -> Vec<Recipient> {
        match &self.to {
            AddressField::Single(address) => vec![Recipient {
                email: address.clone(),
                name: self.to_name.primary(),
            }],
            AddressField::List(recipients) => recipients.clone(),
        }
    }

    /// Explicit presence check for every field a send requires.
    fn has_required_fields(&self) -> bool {
        let to_present = match &self.to {
            AddressField::Single(address) => !address.is_empty(),
            AddressField::List(recipients) => !recipients.is_empty(),
        };
        to_present
            && !self.to_name.is_empty()
            && !self.from.is_empty()
            && !self.from_name.is_empty()
            && !self.subject.is_empty()
            && !self.text.is_empty()
            && !self.html.is_empty()
    }
}

/// One recorded send failure: a local precondition error, a provider error
/// embedded in a response body, or a transport error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl SendError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }
}

/// Error body shape returned by the provider.
#[derive(Debug, Deserialize)]
struct ProviderResponseBody {
    #[serde(default)]
    errors: Vec<SendError>,
}

#[derive(Debug, Serialize)]
struct SenderObject<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct ContentPart<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SandboxMode {
    enable: bool,
}

#[derive(Debug, Serialize)]
struct MailSettings {
    sandbox_mode: SandboxMode,
}

/// Provider payload for one send.
#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    to: Vec<Recipient>,
    from: SenderObject<'a>,
    subject: &'a str,
    content: Vec<ContentPart<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mail_settings: Option<MailSettings>,
}

/// Stateful wrapper around the email-delivery API.
///
/// `send` resets the error and response state on every call, so a client
/// can be reused without errors accumulating across attempts.
pub struct EmailClient {
    message: EmailMessage,
    api_key: String,
    api_base: String,
    sandbox: bool,
    http: reqwest::Client,
    errors: Option<Vec<SendError>>,
    response_status: Option<u16>,
}

impl EmailClient {
    pub fn new(message: EmailMessage, config: &Config) -> Self {
        Self {
            message,
            api_key: config.sendgrid_api_key.clone(),
            api_base: config.sendgrid_api_base.clone(),
            sandbox: config.is_dev,
            http: reqwest::Client::new(),
            errors: None,
            response_status: None,
        }
    }

    /// Whether any error has been recorded since the last `send`, including
    /// an explicitly stored empty provider error list.
    pub fn in_error(&self) -> bool {
        self.errors.is_some()
    }

    /// Recorded errors, or `None` when none have been recorded.
    pub fn errors(&self) -> Option<&[SendError]> {
        self.errors.as_deref()
    }

    /// Status of the last provider response, when one was received.
    pub fn response_status(&self) -> Option<u16> {
        self.response_status
    }

    fn add_error(&mut self, error: SendError) {
        self.errors.get_or_insert_with(Vec::new).push(error);
    }

    /// Validate the sender and every recipient address, recording one
    /// descriptive error per malformed address. Any recorded error blocks
    /// the send.
    fn validate_addresses(&mut self) -> bool {
        let mut invalid = Vec::new();

        match &self.message.to {
            AddressField::Single(address) => {
                if !is_email_address(address) {
                    invalid.push(SendError::new(format!(
                        "Unable to send email. 'To email' address {address} is improperly formatted."
                    )));
                }
            }
            AddressField::List(recipients) => {
                for recipient in recipients {
                    if !is_email_address(&recipient.email) {
                        invalid.push(SendError::new(format!(
                            "Failed to send email to {}. Email improperly formatted.",
                            recipient.email
                        )));
                    }
                }
            }
        }

        if !is_email_address(&self.message.from) {
            invalid.push(SendError::new(format!(
                "Unable to send email. 'From email' address {} is improperly formatted.",
                self.message.from
            )));
        }

        let valid = invalid.is_empty();
        for error in invalid {
            self.add_error(error);
        }
        valid
    }

    fn build_payload(&self) -> MailPayload<'_> {
        MailPayload {
            to: self.message.recipients(),
            from: SenderObject {
                email: &self.message.from,
                name: &self.message.from_name,
            },
            subject: &self.message.subject,
            content: vec![
                ContentPart {
                    content_type: "text/plain",
                    value: &self.message.text,
                },
                ContentPart {
                    content_type: "text/html",
                    value: &self.message.html,
                },
            ],
            mail_settings: self.sandbox.then_some(MailSettings {
                sandbox_mode: SandboxMode { enable: true },
            }),
        }
    }

    /// Attempt the send. Resets error and response state, validates the
    /// addresses and required fields, and calls the provider; every failure
    /// is recorded into the error list rather than returned.
    pub async fn send(&mut self) {
        self.errors = None;
        self.response_status = None;

        if !self.validate_addresses() {
            return;
        }

        if !self.message.has_required_fields() {
            self.add_error(SendError::new(
                "Failed to send email. 'To email', 'To Name', 'From email', 'From Name', \
                 'Subject', 'Email Text Body', and 'Email HTML Body' are required",
            ));
            return;
        }

        let url = format!("{}{}", self.api_base, MAIL_SEND_PATH);
        let result = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_payload())
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                self.response_status = Some(status.as_u16());
                let body = response.text().await.unwrap_or_default();

                if status.is_success() {
                    // A 2xx body may still embed a provider error list.
                    if let Ok(parsed) = serde_json::from_str::<ProviderResponseBody>(&body) {
                        if !parsed.errors.is_empty() {
                            self.errors = Some(parsed.errors);
                        }
                    }
                    debug!(status = status.as_u16(), "email provider accepted send");
                } else {
                    warn!(status = status.as_u16(), "email provider rejected send");
                    match serde_json::from_str::<ProviderResponseBody>(&body) {
                        Ok(parsed) if !parsed.errors.is_empty() => {
                            self.errors = Some(parsed.errors);
                        }
                        _ => self.add_error(SendError::new(format!(
                            "Email provider returned status {}",
                            status.as_u16()
                        ))),
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "email provider request failed");
                self.add_error(SendError::new(format!(
                    "Failed to reach email provider: {e}"
                )));
            }
        }
    }
}
