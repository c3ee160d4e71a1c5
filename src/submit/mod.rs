//! # Submission
//!
//! Sends collected dialog values (or a cancellation notice) back to the
//! integration that opened the dialog.
//!
//! ```text
//! POST {url}
//! {
//!   "callback_id": "...",
//!   "state": "...",
//!   "submission": { "field": value, ... },
//!   "cancelled": false
//! }
//! ```
//!
//! The server answers with nothing (accepted) or with
//! `{"errors": {"field": "message"}, "error": "..."}` (rejected).

pub mod http;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::form::{FieldErrors, FormValues};

pub use http::HttpSubmitter;

/// Request body for a submission or cancellation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogSubmission {
    /// Destination; not part of the body.
    #[serde(skip)]
    pub url: String,
    pub callback_id: String,
    pub state: String,
    pub submission: FormValues,
    pub cancelled: bool,
}

/// What the server made of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted,
    /// Server-side validation failed. `errors` is keyed by field name;
    /// `error` is a message for the dialog as a whole.
    Rejected {
        errors: FieldErrors,
        error: Option<String>,
    },
}

/// Errors that can occur while talking to the integration.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// Submitter misconfigured (bad URL, client could not be built).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Server returned a non-success status.
    Api { status: u16, message: String },
    /// Response body could not be understood.
    Parse(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Config(msg) => write!(f, "config error: {msg}"),
            SubmitError::Network(msg) => write!(f, "network error: {msg}"),
            SubmitError::Api { status, message } => {
                write!(f, "server error (HTTP {status}): {message}")
            }
            SubmitError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for SubmitError {}

#[async_trait]
pub trait DialogSubmitter: Send + Sync {
    /// Returns the name of the submitter.
    fn name(&self) -> &str;

    /// Deliver a submission (or cancellation) and report the server's verdict.
    async fn submit(&self, submission: &DialogSubmission) -> Result<SubmitOutcome, SubmitError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_shape() {
        let submission = DialogSubmission {
            url: "http://example.com/hook".to_string(),
            callback_id: "cb".to_string(),
            state: "st".to_string(),
            submission: FormValues::default().with_value("a", json!("x")),
            cancelled: false,
        };
        let body = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            body,
            json!({
                "callback_id": "cb",
                "state": "st",
                "submission": {"a": "x"},
                "cancelled": false
            })
        );
    }

    #[test]
    fn test_error_display() {
        let err = SubmitError::Api {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.to_string(), "server error (HTTP 503): down");
    }
}
