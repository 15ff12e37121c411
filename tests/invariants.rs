//! Contract Invariant Tests
//!
//! These tests verify the submit-pipeline guarantees.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use zititex_contact::{
    ContactApi, ContactSubmission, FailureKind, FormSchema, SubmissionCoordinator,
    SubmissionResult, SubmissionStatus, SubmitOutcome,
};

/// Records every payload and answers with a canned result
struct FakeApi {
    calls: Mutex<Vec<ContactSubmission>>,
    reply: SubmissionResult,
    delay: Option<Duration>,
}

impl FakeApi {
    fn answering(reply: SubmissionResult) -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(vec![]), reply, delay: None })
    }

    fn slow(reply: SubmissionResult, delay: Duration) -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(vec![]), reply, delay: Some(delay) })
    }

    fn calls(&self) -> Vec<ContactSubmission> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ContactApi for FakeApi {
    async fn send_contact_form(&self, payload: &ContactSubmission) -> SubmissionResult {
        self.calls.lock().push(payload.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

fn fill_valid(coordinator: &SubmissionCoordinator<Arc<FakeApi>>) {
    coordinator.set_value("full_name", "  Ana Pérez ").unwrap();
    coordinator.set_value("email", "ana@example.com").unwrap();
    coordinator.set_value("phone", "+57 300 123 4567").unwrap();
    coordinator.set_value("company", " Textiles SAS").unwrap();
    coordinator.set_value("product_type", "Etiquetas Tejidas").unwrap();
    coordinator.set_value("message", "Necesito 500 etiquetas tejidas para camisetas.\n").unwrap();
}

#[tokio::test]
async fn invariant_valid_form_sends_exactly_once_with_trimmed_values() {
    let api = FakeApi::answering(SubmissionResult::sent(json!({"id": "abc"})));
    let coordinator = SubmissionCoordinator::new(FormSchema::zititex(), api.clone());
    fill_valid(&coordinator);

    let outcome = coordinator.submit().await;
    assert!(outcome.is_sent());

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    let sent = &calls[0];
    assert_eq!(sent.full_name, "Ana Pérez");
    assert_eq!(sent.email, "ana@example.com");
    assert_eq!(sent.company, "Textiles SAS");
    assert_eq!(sent.quantity, "");
    assert_eq!(sent.message, "Necesito 500 etiquetas tejidas para camisetas.");
}

#[tokio::test]
async fn invariant_invalid_form_never_dispatches() {
    let api = FakeApi::answering(SubmissionResult::sent(json!({})));
    let coordinator = SubmissionCoordinator::new(FormSchema::zititex(), api.clone());
    fill_valid(&coordinator);
    coordinator.set_value("email", "not-an-email").unwrap();
    coordinator.set_value("message", "corto").unwrap();

    let outcome = coordinator.submit().await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure, got {:?}", outcome);
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("email"), Some("Por favor ingresa un email válido"));
    assert_eq!(errors.get("message"), Some("Mensaje debe tener al menos 10 caracteres"));
    assert!(api.calls().is_empty());

    let state = coordinator.snapshot();
    assert_eq!(state.errors(), &errors);
    assert_eq!(state.status(), SubmissionStatus::Idle);
}

#[tokio::test]
async fn invariant_success_resets_values() {
    let api = FakeApi::answering(SubmissionResult::sent(json!({"id": "abc"})));
    let coordinator = SubmissionCoordinator::new(FormSchema::zititex(), api);
    fill_valid(&coordinator);

    coordinator.submit().await;

    let state = coordinator.snapshot();
    assert_eq!(state.status(), SubmissionStatus::Success);
    assert!(state.values().iter().all(|(_, v)| v.is_empty()));
    assert!(state.errors().is_empty());
}

#[tokio::test]
async fn invariant_failure_keeps_values_and_reports_separately() {
    let api = FakeApi::answering(SubmissionResult::failed(FailureKind::Api, "Invalid email"));
    let coordinator = SubmissionCoordinator::new(FormSchema::zititex(), api);
    fill_valid(&coordinator);
    let before = coordinator.snapshot().values().clone();

    let outcome = coordinator.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Failed(ref r) if r.error.as_deref() == Some("Invalid email")));

    let state = coordinator.snapshot();
    assert_eq!(state.status(), SubmissionStatus::Error);
    assert_eq!(state.values(), &before);
    assert_eq!(state.submission_error(), Some("Invalid email"));
    assert!(state.errors().is_empty(), "failure message must not land in field errors");
}

#[tokio::test]
async fn invariant_edit_clears_error_without_revalidating() {
    let api = FakeApi::answering(SubmissionResult::sent(json!({})));
    let coordinator = SubmissionCoordinator::new(FormSchema::zititex(), api);

    coordinator.submit().await;
    assert!(coordinator.snapshot().errors().get("email").is_some());

    coordinator.set_value("email", "still wrong").unwrap();
    let state = coordinator.snapshot();
    assert!(state.errors().get("email").is_none());
    assert!(state.errors().get("phone").is_some());
}

#[tokio::test]
async fn invariant_second_submit_while_in_flight_is_rejected() {
    let api = FakeApi::slow(SubmissionResult::sent(json!({})), Duration::from_millis(200));
    let coordinator = Arc::new(SubmissionCoordinator::new(FormSchema::zititex(), api.clone()));
    fill_valid(&coordinator);

    let first = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.submit().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(coordinator.status(), SubmissionStatus::Submitting);

    assert_eq!(coordinator.submit().await, SubmitOutcome::Busy);
    assert!(first.await.unwrap().is_sent());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn invariant_cancel_returns_to_idle_with_values() {
    let api = FakeApi::slow(SubmissionResult::sent(json!({})), Duration::from_secs(30));
    let coordinator = SubmissionCoordinator::new(FormSchema::zititex(), api);
    fill_valid(&coordinator);
    let before = coordinator.snapshot().values().clone();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    assert_eq!(coordinator.submit_with_cancel(cancel).await, SubmitOutcome::Cancelled);
    let state = coordinator.snapshot();
    assert_eq!(state.status(), SubmissionStatus::Idle);
    assert_eq!(state.values(), &before);

    // the guard is released, a new submit goes through validation again
    coordinator.set_value("email", "").unwrap();
    assert!(matches!(coordinator.submit().await, SubmitOutcome::Invalid(_)));
}

#[tokio::test]
async fn invariant_already_cancelled_token_never_dispatches() {
    let api = FakeApi::answering(SubmissionResult::sent(json!({"id": "abc"})));
    let coordinator = SubmissionCoordinator::new(FormSchema::zititex(), api.clone());
    fill_valid(&coordinator);
    let before = coordinator.snapshot().values().clone();

    for _ in 0..50 {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(coordinator.submit_with_cancel(cancel).await, SubmitOutcome::Cancelled);
    }

    assert!(api.calls().is_empty());
    let state = coordinator.snapshot();
    assert_eq!(state.status(), SubmissionStatus::Idle);
    assert_eq!(state.values(), &before);
}

#[test]
fn invariant_field_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"name": "email", "label": "Correo", "type": "email", "required": true,
              "validation": {{"pattern": "^[^\\s@]+@[^\\s@]+\\.[^\\s@]+$"}}}},
            {{"name": "message", "label": "Mensaje", "type": "textarea",
              "validation": {{"minLength": 10}}}}
        ]"#
    )
    .unwrap();

    let schema = FormSchema::load_from_file(file.path()).unwrap();
    assert_eq!(schema.fields().len(), 2);
    let email = schema.get("email").unwrap();
    assert_eq!(
        zititex_contact::validate_field(email, "nope").as_deref(),
        Some("Por favor ingresa un email válido")
    );
}

#[test]
fn invariant_missing_field_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FormSchema::load_from_file(&dir.path().join("missing.json"));
    assert!(result.is_err());
}
