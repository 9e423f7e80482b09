//! Extraction service.

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use tracing::debug;

use crate::{
    backend::BackendClient,
    domain::intake::{errors::IntakeServiceError, models::OrderText},
};

#[derive(Debug, Clone)]
pub struct HttpExtractionService {
    client: BackendClient,
}

impl HttpExtractionService {
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn extract_order(&self, text: &str) -> Result<Value, IntakeServiceError> {
        let body = OrderText {
            order_text: text.to_string(),
        };

        let extraction: Value = self.client.post_json("extract-order", &body).await?;

        debug!(chars = text.len(), "received order extraction");

        Ok(extraction)
    }
}

#[automock]
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Turn free text into whatever order document the backend produces.
    async fn extract_order(&self, text: &str) -> Result<Value, IntakeServiceError>;
}
