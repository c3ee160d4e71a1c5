//! HTTP submitter: POSTs the submission as JSON to the dialog's url.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::core::form::FieldErrors;
use crate::submit::{DialogSubmission, DialogSubmitter, SubmitError, SubmitOutcome};

/// Shape of a validation reply. Both parts are optional.
#[derive(Deserialize, Debug, Default)]
struct SubmitResponse {
    #[serde(default)]
    errors: Option<FieldErrors>,
    #[serde(default)]
    error: Option<String>,
}

impl SubmitResponse {
    fn into_outcome(self) -> SubmitOutcome {
        let errors = self.errors.unwrap_or_default();
        let error = self.error.filter(|e| !e.trim().is_empty());
        if errors.is_empty() && error.is_none() {
            SubmitOutcome::Accepted
        } else {
            SubmitOutcome::Rejected { errors, error }
        }
    }
}

pub struct HttpSubmitter {
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl HttpSubmitter {
    pub fn new(auth_token: Option<String>, timeout: Duration) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmitError::Config(e.to_string()))?;
        Ok(Self { client, auth_token })
    }
}

#[async_trait]
impl DialogSubmitter for HttpSubmitter {
    fn name(&self) -> &str {
        "http"
    }

    async fn submit(&self, submission: &DialogSubmission) -> Result<SubmitOutcome, SubmitError> {
        let url = reqwest::Url::parse(&submission.url)
            .map_err(|e| SubmitError::Config(format!("invalid url '{}': {e}", submission.url)))?;

        info!(
            "Submitting dialog: url={}, callback_id={}, fields={}, cancelled={}",
            url,
            submission.callback_id,
            submission.submission.len(),
            submission.cancelled
        );

        let mut request = self.client.post(url).json(submission);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Submission response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Submission rejected by server: {} - {}", status, body);
            return Err(SubmitError::Api {
                status: status.as_u16(),
                message: if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    body
                },
            });
        }

        if body.trim().is_empty() {
            return Ok(SubmitOutcome::Accepted);
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value::<SubmitResponse>(value)
                .map(SubmitResponse::into_outcome)
                .map_err(|e| SubmitError::Parse(format!("unexpected response shape: {e}"))),
            Ok(_) | Err(_) => {
                // Integrations commonly answer with plain text like "OK"
                debug!("Non-object submission response treated as accepted");
                Ok(SubmitOutcome::Accepted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_accepted() {
        let parsed: SubmitResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.into_outcome(), SubmitOutcome::Accepted);
    }

    #[test]
    fn test_blank_error_ignored() {
        let parsed: SubmitResponse =
            serde_json::from_str(r#"{"error": "  ", "errors": {}}"#).unwrap();
        assert_eq!(parsed.into_outcome(), SubmitOutcome::Accepted);
    }

    #[test]
    fn test_field_errors_rejected() {
        let parsed: SubmitResponse =
            serde_json::from_str(r#"{"errors": {"a": "bad"}}"#).unwrap();
        match parsed.into_outcome() {
            SubmitOutcome::Rejected { errors, error } => {
                assert_eq!(errors.get("a").map(String::as_str), Some("bad"));
                assert!(error.is_none());
            }
            SubmitOutcome::Accepted => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_null_errors_accepted() {
        let parsed: SubmitResponse = serde_json::from_str(r#"{"errors": null}"#).unwrap();
        assert_eq!(parsed.into_outcome(), SubmitOutcome::Accepted);
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let submitter = HttpSubmitter::new(None, Duration::from_secs(1)).unwrap();
        let submission = DialogSubmission {
            url: "not a url".to_string(),
            callback_id: String::new(),
            state: String::new(),
            submission: Default::default(),
            cancelled: false,
        };
        let result = tokio_test::block_on(submitter.submit(&submission));
        assert!(matches!(result, Err(SubmitError::Config(_))));
    }
}
