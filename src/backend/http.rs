//! HTTP implementation of the customer backend
//!
//! Also hosts token verification, which the wider application uses but the
//! intake screen itself does not.

use crate::backend::{CustomerBackend, CustomerPayload, DocumentTypeOption, SubmitResponse};
use crate::config::BackendConfig;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

const DOCUMENT_TYPES_PATH: &str = "tipoDocumento";
const CUSTOMER_PATH: &str = "cliente";
const TOKEN_PATH: &str = "token";
const TOKEN_HEADER: &str = "Token";

/// reqwest-backed customer backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Ask the backend whether a session token is still valid
    pub async fn verify_token(&self, token: &str) -> Result<SubmitResponse> {
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Token verification failed: {}", e)))?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(Error::Backend(format!(
            "Backend returned status: {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Backend(format!("Failed to parse backend response: {}", e)))
}

impl CustomerBackend for HttpBackend {
    async fn document_types(&self) -> Result<Vec<DocumentTypeOption>> {
        let response = self
            .client
            .get(self.url(DOCUMENT_TYPES_PATH))
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Document type request failed: {}", e)))?;

        let types: Vec<DocumentTypeOption> = decode(response).await?;
        debug!(count = types.len(), "loaded document types");
        Ok(types)
    }

    async fn create_customer(&self, payload: &CustomerPayload) -> Result<SubmitResponse> {
        let response = self
            .client
            .post(self.url(CUSTOMER_PATH))
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Customer request failed: {}", e)))?;

        decode(response).await
    }
}
