//! Field Definitions - The Form Contract
//!
//! Fields are declared once and never change while a form is mounted.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub type FieldName = String;

pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub const PHONE_PATTERN: &str = r"^[+]?[0-9\s\-\(\)]{10,}$";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Form has no fields")]
    Empty,

    #[error("Failed to read field definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid field definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Textarea,
    Select,
}

/// Compiled regex that round-trips through its source string.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    #[serde(default)]
    pub id: String,
    pub name: FieldName,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl FormField {
    pub fn new(name: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            placeholder: String::new(),
            options: vec![],
            validation: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }
}

/// Ordered, name-unique set of fields for one form
#[derive(Debug, Clone)]
pub struct FormSchema {
    fields: Vec<FormField>,
}

impl FormSchema {
    pub fn new(fields: Vec<FormField>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        let mut fields = fields;
        for field in &mut fields {
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            if field.id.is_empty() {
                field.id = field.name.clone();
            }
        }

        Ok(Self { fields })
    }

    /// Load a JSON array of field definitions.
    pub fn load_from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        let fields: Vec<FormField> = serde_json::from_str(&content)?;
        Self::new(fields)
    }

    /// The contact form shipped on the Zititex site.
    pub fn zititex() -> Self {
        let email = FieldValidation {
            pattern: Pattern::new(EMAIL_PATTERN).ok(),
            ..Default::default()
        };
        let phone = FieldValidation {
            pattern: Pattern::new(PHONE_PATTERN).ok(),
            ..Default::default()
        };

        Self {
            fields: vec![
                FormField::new("full_name", "Nombre completo", FieldType::Text)
                    .required()
                    .placeholder("Tu nombre completo")
                    .validation(FieldValidation {
                        min_length: Some(2),
                        max_length: Some(100),
                        pattern: None,
                    }),
                FormField::new("email", "Email", FieldType::Email)
                    .required()
                    .placeholder("tu@email.com")
                    .validation(email),
                FormField::new("phone", "Teléfono", FieldType::Tel)
                    .required()
                    .placeholder("+57 300 123 4567")
                    .validation(phone),
                FormField::new("company", "Empresa", FieldType::Text)
                    .placeholder("Nombre de tu empresa (opcional)"),
                FormField::new("product_type", "Tipo de producto", FieldType::Select)
                    .required()
                    .placeholder("Selecciona un producto")
                    .options(&[
                        "Etiquetas Tejidas",
                        "Etiquetas Estampadas",
                        "Marquillas",
                        "Hang Tags",
                        "Consulta General",
                    ]),
                FormField::new("quantity", "Cantidad aproximada", FieldType::Select)
                    .placeholder("Selecciona una cantidad")
                    .options(&[
                        "Menos de 100 unidades",
                        "100 - 500 unidades",
                        "500 - 1000 unidades",
                        "Más de 1000 unidades",
                    ]),
                FormField::new("message", "Mensaje", FieldType::Textarea)
                    .required()
                    .placeholder("Cuéntanos sobre tu proyecto")
                    .validation(FieldValidation {
                        min_length: Some(10),
                        max_length: Some(1000),
                        pattern: None,
                    }),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::zititex()
    }
}
