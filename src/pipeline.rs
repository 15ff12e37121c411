//! Submission Coordinator - Single Entry Point
//!
//! CRITICAL: submit MUST validate every declared field before dispatch. No bypass.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::client::ContactApi;
use crate::fields::FormSchema;
use crate::form::{FormError, FormErrors, FormState, SubmissionStatus};
use crate::submission::{ContactSubmission, SubmissionResult};
use crate::validation::FieldValidator;

/// What a single call to `submit` did
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; no request was made.
    Invalid(FormErrors),
    Sent(SubmissionResult),
    Failed(SubmissionResult),
    /// Another submit was still in flight.
    Busy,
    /// Cancelled before the API answered; values kept.
    Cancelled,
}

impl SubmitOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SubmitOutcome::Sent(_))
    }
}

pub struct SubmissionCoordinator<C> {
    state: Mutex<FormState>,
    validator: FieldValidator,
    client: C,
    in_flight: AtomicBool,
}

impl<C: ContactApi> SubmissionCoordinator<C> {
    pub fn new(schema: FormSchema, client: C) -> Self {
        Self {
            state: Mutex::new(FormState::new(Arc::new(schema))),
            validator: FieldValidator::new(),
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn set_value(&self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.state.lock().set_value(name, value)
    }

    pub fn reset(&self) {
        self.state.lock().reset();
    }

    /// Copy of the current form state for rendering.
    pub fn snapshot(&self) -> FormState {
        self.state.lock().clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.lock().status()
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.submit_with_cancel(CancellationToken::new()).await
    }

    /// Validate, dispatch once, and record the outcome.
    ///
    /// A token that is already cancelled sends nothing. Firing `cancel` while
    /// the request is in flight drops it and returns the form to `Idle` with
    /// its values intact.
    pub async fn submit_with_cancel(&self, cancel: CancellationToken) -> SubmitOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &self.state) else {
            tracing::debug!("submit ignored, previous submission still in flight");
            return SubmitOutcome::Busy;
        };

        if cancel.is_cancelled() {
            tracing::info!("submission cancelled before dispatch");
            return SubmitOutcome::Cancelled;
        }

        let payload = {
            let mut state = self.state.lock();

            // MANDATORY: full validation on every submit.
            let errors = self.validator.validate_form(state.schema(), state.values());
            if !errors.is_empty() {
                tracing::info!(invalid_fields = errors.len(), "submission blocked by validation");
                state.set_errors(errors.clone());
                return SubmitOutcome::Invalid(errors);
            }

            state.set_errors(FormErrors::default());
            state.set_submission_error(None);
            state.set_status(SubmissionStatus::Submitting);
            ContactSubmission::from_values(state.values())
        };

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::info!("submission cancelled");
                return SubmitOutcome::Cancelled;
            }
            result = self.client.send_contact_form(&payload) => result,
        };

        let mut state = self.state.lock();
        if result.success {
            state.set_status(SubmissionStatus::Success);
            state.reset();
            SubmitOutcome::Sent(result)
        } else {
            state.set_status(SubmissionStatus::Error);
            state.set_submission_error(Some(result.message.clone()));
            SubmitOutcome::Failed(result)
        }
    }
}

/// Clears the in-flight flag on every exit path. A submission abandoned
/// mid-request (cancelled or dropped future) falls back to `Idle`.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    state: &'a Mutex<FormState>,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, state: &'a Mutex<FormState>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, state })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.status() == SubmissionStatus::Submitting {
            state.set_status(SubmissionStatus::Idle);
        }
        drop(state);
        self.flag.store(false, Ordering::Release);
    }
}
