//! Shared infrastructure for the outbox Lambda functions.
//!
//! This crate provides common functionality used across both Lambda handlers:
//!
//! - [`validate`]: declarative required-field validation for JSON bodies
//! - [`build_response`] / [`build_error_response`]: uniform response envelopes
//! - [`Logger`]: console + remote-sink logging facade
//! - [`EmailClient`]: SendGrid wrapper with accumulated error state
//! - [`post_log_entry`]: stateless forwarding to the log aggregator
//! - [`Config`]: environment-driven configuration snapshot
//! - [`init_tracing`]: JSON-formatted tracing for the platform log stream
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides stub configurations and canned request
//! bodies for Lambda handler testing. Enable the `test-utils` feature to
//! access it from dependent crates.

#![deny(warnings)]

mod config;
mod email;
mod forwarder;
mod logging;
mod response;
mod tracing_init;
mod validate;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Config, DEFAULT_SENDGRID_API_BASE};
pub use email::{
    is_email_address, AddressField, EmailClient, EmailMessage, NameField, Recipient, SendError,
};
pub use forwarder::{is_success, post_log_entry, ForwardError};
pub use logging::{init_logger, log_message, LogLevel, Logger};
pub use response::{
    build_error_response, build_response, Messages, ResponseEnvelope, ResponseHeaders,
};
pub use tracing_init::init_tracing;
pub use validate::{
    validate, FieldType, Schema, TypeSpec, ValidationError, ValidationResult,
    VALIDATION_ERROR_CODE,
};
