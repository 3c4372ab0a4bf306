//! Customer backend collaborator
//!
//! Document-type lookup and customer creation. `Err` from these calls is a
//! transport failure; a decoded response with a non-"ok" status is a logical
//! rejection carried in [`SubmitResponse`].

pub mod http;

use crate::constants::api::BACKEND_OK;
use crate::error::Result;
use crate::form::CustomerDraft;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

pub use http::HttpBackend;

/// Selectable identity document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeOption {
    #[serde(alias = "idTipoDocumento")]
    pub id: u32,
    #[serde(alias = "nombreTipoDocumento", alias = "tipoDocumento")]
    pub label: String,
}

/// Backend answer to a write call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    #[serde(rename = "msj", alias = "message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitResponse {
    pub fn ok() -> Self {
        Self {
            status: BACKEND_OK.to_string(),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == BACKEND_OK
    }
}

/// Customer record as the backend receives it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPayload {
    #[serde(rename = "documentoCliente")]
    pub document_number: String,
    #[serde(rename = "idTipoDocumento")]
    pub document_type_id: Option<u32>,
    #[serde(rename = "nombreCliente")]
    pub name: String,
    #[serde(rename = "telefonoCliente")]
    pub phone: String,
    #[serde(rename = "correoCliente")]
    pub email: String,
    #[serde(rename = "direccionCliente")]
    pub address: String,
    #[serde(rename = "detalleDireccionCliente")]
    pub address_detail: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<&CustomerDraft> for CustomerPayload {
    fn from(draft: &CustomerDraft) -> Self {
        Self {
            document_number: draft.document_number.clone(),
            document_type_id: draft.document_type_id,
            name: draft.name.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            address: draft.address.clone(),
            address_detail: draft.address_detail.clone(),
            lat: draft.location.map(|c| c.lat),
            lng: draft.location.map(|c| c.lng),
        }
    }
}

/// Persistence collaborator for customer records
pub trait CustomerBackend: Send + Sync {
    /// Ordered list of document types
    fn document_types(&self) -> impl Future<Output = Result<Vec<DocumentTypeOption>>> + Send;

    /// Create a customer
    fn create_customer(
        &self,
        payload: &CustomerPayload,
    ) -> impl Future<Output = Result<SubmitResponse>> + Send;
}

impl<T: CustomerBackend> CustomerBackend for Arc<T> {
    fn document_types(&self) -> impl Future<Output = Result<Vec<DocumentTypeOption>>> + Send {
        (**self).document_types()
    }

    fn create_customer(
        &self,
        payload: &CustomerPayload,
    ) -> impl Future<Output = Result<SubmitResponse>> + Send {
        (**self).create_customer(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    #[test]
    fn test_payload_wire_names() {
        let draft = CustomerDraft {
            document_number: "1234567".to_string(),
            document_type_id: Some(1),
            name: "Ana".to_string(),
            phone: "3001234567".to_string(),
            email: "ana@example.com".to_string(),
            address: "Calle 10 #5-20, Medellín".to_string(),
            address_detail: "Apto 301".to_string(),
            location: Some(Coordinates::new(6.3001, -75.57)),
        };

        let json = serde_json::to_value(CustomerPayload::from(&draft)).unwrap();
        assert_eq!(json["documentoCliente"], "1234567");
        assert_eq!(json["idTipoDocumento"], 1);
        assert_eq!(json["direccionCliente"], "Calle 10 #5-20, Medellín");
        assert_eq!(json["detalleDireccionCliente"], "Apto 301");
        assert_eq!(json["lat"], 6.3001);
        assert_eq!(json["lng"], -75.57);
    }

    #[test]
    fn test_payload_without_location() {
        let json = serde_json::to_value(CustomerPayload::from(&CustomerDraft::default())).unwrap();
        assert!(json["lat"].is_null());
        assert!(json["lng"].is_null());
    }

    #[test]
    fn test_submit_response_parsing() {
        let ok: SubmitResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(ok.is_ok());
        assert_eq!(ok.message, None);

        let rejected: SubmitResponse =
            serde_json::from_str(r#"{"status": "error", "msj": "duplicate document"}"#).unwrap();
        assert!(!rejected.is_ok());
        assert_eq!(rejected.message.as_deref(), Some("duplicate document"));

        let aliased: SubmitResponse =
            serde_json::from_str(r#"{"status": "error", "message": "bad"}"#).unwrap();
        assert_eq!(aliased.message.as_deref(), Some("bad"));
    }

    #[test]
    fn test_document_type_aliases() {
        let parsed: Vec<DocumentTypeOption> = serde_json::from_str(
            r#"[{"idTipoDocumento": 1, "nombreTipoDocumento": "CC"}, {"id": 2, "label": "NIT"}]"#,
        )
        .unwrap();
        assert_eq!(parsed[0], DocumentTypeOption { id: 1, label: "CC".to_string() });
        assert_eq!(parsed[1].label, "NIT");
    }
}
