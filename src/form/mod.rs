//! Customer draft and the form model that owns it
//!
//! All mutation goes through [`FormModel`], which keeps the dirty flag and
//! the location invariant: coordinates are either absent or belong to the
//! current address line.

pub mod controller;
pub mod validation;

use crate::error::{Error, Result};
use crate::geo::{Coordinates, ResolvedLocation};
use serde::{Deserialize, Serialize};

pub use controller::{FormStatus, IntakeFormController, SubmissionState, SubmitOutcome};
pub use validation::{FieldError, StandardRules, ValidationRules};

/// The in-progress customer record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub document_number: String,
    pub document_type_id: Option<u32>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub address_detail: String,
    pub location: Option<Coordinates>,
}

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DocumentNumber,
    DocumentType,
    Name,
    Phone,
    Email,
    Address,
    AddressDetail,
}

impl Field {
    pub fn all() -> [Field; 7] {
        [
            Field::DocumentNumber,
            Field::DocumentType,
            Field::Name,
            Field::Phone,
            Field::Email,
            Field::Address,
            Field::AddressDetail,
        ]
    }

    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::DocumentNumber => "Documento",
            Field::DocumentType => "Tipo de documento",
            Field::Name => "Nombre",
            Field::Phone => "Teléfono",
            Field::Email => "Correo",
            Field::Address => "Dirección",
            Field::AddressDetail => "Detalle de dirección",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Draft plus dirty tracking
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    draft: CustomerDraft,
    dirty: bool,
}

impl FormModel {
    /// Empty, clean form
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean form prefilled with an existing draft
    pub fn from_draft(draft: CustomerDraft) -> Self {
        Self { draft, dirty: false }
    }

    pub fn draft(&self) -> &CustomerDraft {
        &self.draft
    }

    /// True once any field was touched since load or the last reset
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set a field from user input
    ///
    /// Editing the address line by hand drops the resolved coordinates,
    /// since they no longer belong to it.
    pub fn set(&mut self, field: Field, value: &str) -> Result<()> {
        let draft = &mut self.draft;
        match field {
            Field::DocumentNumber => draft.document_number = value.trim().to_string(),
            Field::DocumentType => {
                let value = value.trim();
                draft.document_type_id = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| {
                        Error::Validation(format!("Invalid document type: {}", value))
                    })?)
                };
            }
            Field::Name => draft.name = value.to_string(),
            Field::Phone => draft.phone = value.trim().to_string(),
            Field::Email => draft.email = value.trim().to_string(),
            Field::Address => {
                if draft.address != value {
                    draft.location = None;
                }
                draft.address = value.to_string();
            }
            Field::AddressDetail => draft.address_detail = value.to_string(),
        }
        self.dirty = true;
        Ok(())
    }

    /// Apply a resolution result: address line and coordinates together
    pub fn patch_location(&mut self, resolved: &ResolvedLocation) {
        self.draft.address = resolved.formatted_address.clone();
        self.draft.location = Some(resolved.coordinates);
        self.dirty = true;
    }

    /// Back to an empty, clean draft
    pub fn reset(&mut self) {
        self.draft = CustomerDraft::default();
        self.dirty = false;
    }
}
