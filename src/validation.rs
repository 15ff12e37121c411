//! Field Validator - Ordered Rules, First Failure Wins
//!
//! Rules are pure functions of (field definition, current value).

use crate::fields::{FieldType, FormField, FormSchema};
use crate::form::{FormErrors, FormValues};

/// One validation step for a single field
pub trait FieldRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, field: &FormField, value: &str) -> Option<String>;
}

// --- Concrete Rules ---

pub struct RequiredRule;

impl FieldRule for RequiredRule {
    fn name(&self) -> &'static str { "required" }

    fn check(&self, field: &FormField, value: &str) -> Option<String> {
        if field.required && value.trim().is_empty() {
            Some(format!("{} es requerido", field.label))
        } else {
            None
        }
    }
}

pub struct MinLengthRule;

impl FieldRule for MinLengthRule {
    fn name(&self) -> &'static str { "min_length" }

    fn check(&self, field: &FormField, value: &str) -> Option<String> {
        let min = field.validation.as_ref()?.min_length.filter(|&n| n > 0)?;
        if char_len(value) < min {
            Some(format!("{} debe tener al menos {} caracteres", field.label, min))
        } else {
            None
        }
    }
}

pub struct MaxLengthRule;

impl FieldRule for MaxLengthRule {
    fn name(&self) -> &'static str { "max_length" }

    fn check(&self, field: &FormField, value: &str) -> Option<String> {
        let max = field.validation.as_ref()?.max_length.filter(|&n| n > 0)?;
        if char_len(value) > max {
            Some(format!("{} no puede tener más de {} caracteres", field.label, max))
        } else {
            None
        }
    }
}

pub struct PatternRule;

impl FieldRule for PatternRule {
    fn name(&self) -> &'static str { "pattern" }

    fn check(&self, field: &FormField, value: &str) -> Option<String> {
        let pattern = field.validation.as_ref()?.pattern.as_ref()?;
        if pattern.is_match(value) {
            return None;
        }

        Some(match field.field_type {
            FieldType::Email => "Por favor ingresa un email válido".to_string(),
            FieldType::Tel => "Por favor ingresa un teléfono válido".to_string(),
            _ => format!("{} no tiene el formato correcto", field.label),
        })
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Runs the rules in declaration order
pub struct FieldValidator {
    rules: Vec<Box<dyn FieldRule>>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RequiredRule),
                Box::new(MinLengthRule),
                Box::new(MaxLengthRule),
                Box::new(PatternRule),
            ],
        }
    }

    /// `None` means the value is valid.
    pub fn validate(&self, field: &FormField, value: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| {
            let message = rule.check(field, value)?;
            tracing::debug!(field = %field.name, rule = rule.name(), "field rejected");
            Some(message)
        })
    }

    /// Validate every declared field. Fields without a value validate as "".
    pub fn validate_form(&self, schema: &FormSchema, values: &FormValues) -> FormErrors {
        let mut errors = FormErrors::default();
        for field in schema.fields() {
            let value = values.get(&field.name).unwrap_or("");
            if let Some(message) = self.validate(field, value) {
                errors.insert(&field.name, message);
            }
        }
        errors
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate one field with the default rule set.
pub fn validate_field(field: &FormField, value: &str) -> Option<String> {
    FieldValidator::new().validate(field, value)
}
