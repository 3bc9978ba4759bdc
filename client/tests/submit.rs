//! Submission against a mock registration server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use registration_client::client::{CONNECTION_ERROR_MESSAGE, GENERIC_REJECTION_MESSAGE};
use registration_client::{ClientError, RegistrationClient, SubmissionDraft, ValidationError};
use registration_core::batch::{BillingData, Participant};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn filled_draft() -> SubmissionDraft {
    let mut draft = SubmissionDraft::new();
    draft.billing = BillingData {
        tax_id: "J-001234567".into(),
        fiscal_name: "Acme Eventos C.A.".into(),
        fiscal_address: "Av. Principal, Caracas".into(),
        phone: "02125551234".into(),
        sector: "Privado".into(),
        invoice_type: None,
    };
    *draft.participant_mut(0).unwrap() = Participant {
        national_id: "12345678".into(),
        validator_code: "ABC123".into(),
        first_name: "Ana".into(),
        last_name: "Pérez".into(),
        mobile_phone: "04145551234".into(),
        email: "ana@example.com".into(),
        organization_name: "Acme Eventos C.A.".into(),
        organization_tax_id: "J-001234567".into(),
        role: "Gerente".into(),
        sector: "Privado".into(),
        ..Participant::default()
    };
    draft
}

#[tokio::test]
async fn test_successful_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register-participants"))
        .and(body_partial_json(json!({
            "billingData": { "RIFCedulaFacturacion": "J-001234567", "TFactura": "Pro forma" },
            "participants": [{ "IDValidadorParticipante": "ABC123", "NacionalidadParticipante": "V" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Registration completed successfully.",
            "recordCount": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = RegistrationClient::new(&server.uri())
        .unwrap()
        .submit(&filled_draft())
        .await
        .unwrap();

    assert_eq!(response.record_count, 1);
}

#[tokio::test]
async fn test_conflict_message_is_shown_verbatim() {
    let server = MockServer::start().await;
    let message = "Validation error: the following validator code(s) have already been used: ABC123.";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "CONFLICT",
            "message": message
        })))
        .mount(&server)
        .await;

    let err = RegistrationClient::new(&server.uri())
        .unwrap()
        .submit(&filled_draft())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Rejected { status: 409, .. }));
    assert_eq!(err.display_message(), message);
}

#[tokio::test]
async fn test_rejection_without_message_uses_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = RegistrationClient::new(&server.uri())
        .unwrap()
        .submit(&filled_draft())
        .await
        .unwrap_err();

    assert_eq!(err.display_message(), GENERIC_REJECTION_MESSAGE);
}

#[tokio::test]
async fn test_non_json_response_is_a_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = RegistrationClient::new(&server.uri())
        .unwrap()
        .submit(&filled_draft())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ResponseParseFailed(_)));
    assert_eq!(err.display_message(), CONNECTION_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_invalid_draft_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut draft = filled_draft();
    draft.participant_mut(0).unwrap().validator_code = "ABC".into();

    let err = RegistrationClient::new(&server.uri())
        .unwrap()
        .submit(&draft)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Invalid(ValidationError::ValidatorCodeLength { position: 1 })
    ));
}
