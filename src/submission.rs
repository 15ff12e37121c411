//! Submission payload and the uniform result shape handed back to the UI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::FormValues;

pub const SUCCESS_MESSAGE: &str = "Contact form sent successfully";

/// Body of `POST /contact/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub company: String,
    pub product_type: String,
    #[serde(default)]
    pub quantity: String,
    pub message: String,
}

impl ContactSubmission {
    /// Build from form values, trimming every field. Missing fields become "".
    pub fn from_values(values: &FormValues) -> Self {
        let field = |name: &str| values.get(name).unwrap_or("").trim().to_string();
        Self {
            full_name: field("full_name"),
            email: field("email"),
            phone: field("phone"),
            company: field("company"),
            product_type: field("product_type"),
            quantity: field("quantity"),
            message: field("message"),
        }
    }

    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: self.company.trim().to_string(),
            product_type: self.product_type.trim().to_string(),
            quantity: self.quantity.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// Sample used to smoke-test a deployed contact API.
    pub fn sample() -> Self {
        Self {
            full_name: "Test Usuario".to_string(),
            email: "test@example.com".to_string(),
            phone: "+57 300 123 4567".to_string(),
            company: "Test Company".to_string(),
            product_type: "Consulta General".to_string(),
            quantity: "100 - 500 unidades".to_string(),
            message: "Este es un mensaje de prueba del sistema de contacto de Zititex.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotConfigured,
    Transport,
    HtmlResponse,
    InvalidJson,
    Api,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

impl SubmissionResult {
    pub fn sent(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: SUCCESS_MESSAGE.to_string(),
            error: None,
            kind: None,
        }
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            data: None,
            error: Some(message.clone()),
            message,
            kind: Some(kind),
        }
    }
}
