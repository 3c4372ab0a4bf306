//! Field rules
//!
//! The controller only needs a [`ValidationRules`] implementation; the
//! standard rule set mirrors the intake form's declared patterns.

use crate::form::{CustomerDraft, Field};
use regex::Regex;
use std::sync::OnceLock;

/// A failed rule for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// None for record-level rules such as the resolved location
    pub field: Option<Field>,
    pub message: String,
}

impl FieldError {
    fn on(field: Field, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Validation collaborator
pub trait ValidationRules: Send + Sync {
    /// All failing rules; empty means the draft may be submitted
    fn validate(&self, draft: &CustomerDraft) -> Vec<FieldError>;
}

/// Required fields, document/phone/email patterns and a resolved location
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

fn document_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{7,10}$").expect("static pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("static pattern"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static pattern")
    })
}

fn check(
    errors: &mut Vec<FieldError>,
    field: Field,
    value: &str,
    pattern: Option<&Regex>,
    hint: &str,
) {
    if value.trim().is_empty() {
        errors.push(FieldError::on(field, "es obligatorio"));
    } else if let Some(pattern) = pattern {
        if !pattern.is_match(value) {
            errors.push(FieldError::on(field, hint));
        }
    }
}

impl ValidationRules for StandardRules {
    fn validate(&self, draft: &CustomerDraft) -> Vec<FieldError> {
        let mut errors = Vec::new();

        check(
            &mut errors,
            Field::DocumentNumber,
            &draft.document_number,
            Some(document_pattern()),
            "debe tener entre 7 y 10 dígitos",
        );
        if draft.document_type_id.is_none() {
            errors.push(FieldError::on(Field::DocumentType, "es obligatorio"));
        }
        check(&mut errors, Field::Name, &draft.name, None, "");
        check(
            &mut errors,
            Field::Phone,
            &draft.phone,
            Some(phone_pattern()),
            "debe tener 10 dígitos",
        );
        check(
            &mut errors,
            Field::Email,
            &draft.email,
            Some(email_pattern()),
            "no es un correo válido",
        );
        check(&mut errors, Field::Address, &draft.address, None, "");

        if !draft.address.trim().is_empty() && draft.location.is_none() {
            errors.push(FieldError {
                field: None,
                message: "La dirección no ha sido ubicada en el mapa".to_string(),
            });
        }

        errors
    }
}
