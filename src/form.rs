//! Form State Holder
//!
//! Errors are cleared optimistically on edit and only recomputed on submit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::fields::FormSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Current value of every field, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn empty_for(schema: &FormSchema) -> Self {
        Self(schema.names().map(|n| (n.to_string(), String::new())).collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Per-field error messages. An absent key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn insert(&mut self, name: &str, message: impl Into<String>) {
        self.0.insert(name.to_string(), message.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// State of one mounted form
#[derive(Debug, Clone)]
pub struct FormState {
    schema: Arc<FormSchema>,
    values: FormValues,
    errors: FormErrors,
    status: SubmissionStatus,
    submission_error: Option<String>,
}

impl FormState {
    pub fn new(schema: Arc<FormSchema>) -> Self {
        let values = FormValues::empty_for(&schema);
        Self {
            schema,
            values,
            errors: FormErrors::default(),
            status: SubmissionStatus::Idle,
            submission_error: None,
        }
    }

    /// Overwrite a field value and drop any error recorded for it.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        if self.schema.get(name).is_none() {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.values.set(name, value);
        self.errors.remove(name);
        Ok(())
    }

    /// Every declared field back to "", all errors cleared.
    pub fn reset(&mut self) {
        self.values = FormValues::empty_for(&self.schema);
        self.errors = FormErrors::default();
        self.submission_error = None;
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub(crate) fn set_errors(&mut self, errors: FormErrors) {
        self.errors = errors;
    }

    pub(crate) fn set_status(&mut self, status: SubmissionStatus) {
        self.status = status;
    }

    pub(crate) fn set_submission_error(&mut self, message: Option<String>) {
        self.submission_error = message;
    }
}
