use std::time::Duration;

use interactive_dialog::core::form::FormValues;
use interactive_dialog::submit::{
    DialogSubmission, DialogSubmitter, HttpSubmitter, SubmitError, SubmitOutcome,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// A submission for `{server}/hooks/dialog` with one value.
fn create_submission(server: &MockServer) -> DialogSubmission {
    DialogSubmission {
        url: format!("{}/hooks/dialog", server.uri()),
        callback_id: "cb-1".to_string(),
        state: "state-1".to_string(),
        submission: FormValues::default().with_value("summary", json!("Disk full")),
        cancelled: false,
    }
}

fn submitter() -> HttpSubmitter {
    HttpSubmitter::new(None, Duration::from_secs(5)).unwrap()
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/hooks/dialog"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// Accepted
// ============================================================================

#[tokio::test]
async fn test_empty_body_is_accepted() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, ResponseTemplate::new(200)).await;

    let result = submitter().submit(&create_submission(&mock_server)).await;
    assert_eq!(result, Ok(SubmitOutcome::Accepted));
}

#[tokio::test]
async fn test_empty_object_is_accepted() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    let result = submitter().submit(&create_submission(&mock_server)).await;
    assert_eq!(result, Ok(SubmitOutcome::Accepted));
}

#[tokio::test]
async fn test_plain_text_body_is_accepted() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, ResponseTemplate::new(200).set_body_string("OK")).await;

    let result = submitter().submit(&create_submission(&mock_server)).await;
    assert_eq!(result, Ok(SubmitOutcome::Accepted));
}

// ============================================================================
// Request Shape
// ============================================================================

#[tokio::test]
async fn test_request_body_and_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hooks/dialog"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!({
            "callback_id": "cb-1",
            "state": "state-1",
            "submission": {"summary": "Disk full"},
            "cancelled": false
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let submitter =
        HttpSubmitter::new(Some("secret-token".to_string()), Duration::from_secs(5)).unwrap();
    let result = submitter.submit(&create_submission(&mock_server)).await;
    assert_eq!(result, Ok(SubmitOutcome::Accepted));
}

#[tokio::test]
async fn test_cancellation_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hooks/dialog"))
        .and(body_json(json!({
            "callback_id": "cb-1",
            "state": "state-1",
            "submission": {},
            "cancelled": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut submission = create_submission(&mock_server);
    submission.submission = FormValues::default();
    submission.cancelled = true;

    let result = submitter().submit(&submission).await;
    assert_eq!(result, Ok(SubmitOutcome::Accepted));
}

// ============================================================================
// Rejected
// ============================================================================

#[tokio::test]
async fn test_field_errors_are_rejected() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({
            "errors": {"summary": "Be more specific"}
        })),
    )
    .await;

    let result = submitter().submit(&create_submission(&mock_server)).await;
    match result {
        Ok(SubmitOutcome::Rejected { errors, error }) => {
            assert_eq!(
                errors.get("summary").map(String::as_str),
                Some("Be more specific")
            );
            assert!(error.is_none());
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generic_error_is_rejected() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({"error": "Integration is read-only"})),
    )
    .await;

    let result = submitter().submit(&create_submission(&mock_server)).await;
    match result {
        Ok(SubmitOutcome::Rejected { errors, error }) => {
            assert!(errors.is_empty());
            assert_eq!(error.as_deref(), Some("Integration is read-only"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_is_api_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let result = submitter().submit(&create_submission(&mock_server)).await;
    match result {
        Err(SubmitError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("Internal Server Error"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_error_body_uses_reason() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, ResponseTemplate::new(404)).await;

    let result = submitter().submit(&create_submission(&mock_server)).await;
    assert_eq!(
        result,
        Err(SubmitError::Api {
            status: 404,
            message: "Not Found".to_string()
        })
    );
}

#[tokio::test]
async fn test_malformed_object_is_parse_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({"errors": "not a map"})),
    )
    .await;

    let result = submitter().submit(&create_submission(&mock_server)).await;
    assert!(matches!(result, Err(SubmitError::Parse(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let mock_server = MockServer::start().await;
    let submission = create_submission(&mock_server);
    // Shut the server down so the port refuses connections
    drop(mock_server);

    let result = submitter().submit(&submission).await;
    assert!(matches!(result, Err(SubmitError::Network(_))));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
    )
    .await;

    let submitter = HttpSubmitter::new(None, Duration::from_millis(50)).unwrap();
    let result = submitter.submit(&create_submission(&mock_server)).await;
    assert!(matches!(result, Err(SubmitError::Network(_))));
}
