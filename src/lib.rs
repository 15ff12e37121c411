//! Zititex Contact - Contact Form Pipeline
//!
//! # Flow
//! 1. Field definitions are fixed when the form mounts
//! 2. Edits clear a field's error, they never revalidate it
//! 3. Submit validates every field; any error blocks the request
//! 4. One POST per submit, no retries
//! 5. The API client never fails: every outcome is a `SubmissionResult`

pub mod fields;
pub mod validation;
pub mod form;
pub mod submission;
pub mod config;
pub mod client;
pub mod pipeline;

pub use fields::{FieldType, FieldValidation, FormField, FormSchema, Pattern, SchemaError};
pub use validation::{validate_field, FieldRule, FieldValidator};
pub use form::{FormError, FormErrors, FormState, FormValues, SubmissionStatus};
pub use submission::{ContactSubmission, FailureKind, SubmissionResult};
pub use config::ApiConfig;
pub use client::{interpret_response, ApiError, ContactApi, HttpContactClient};
pub use pipeline::{SubmissionCoordinator, SubmitOutcome};

pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");
