//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use tracing::info;

use crate::{
    backend::BackendClient,
    domain::orders::{
        errors::OrdersServiceError,
        models::{OrderAck, OrderDraft},
    },
};

const CLEAN_ORDER_PATH: &str = "clean-order";

#[derive(Debug, Clone)]
pub struct HttpOrdersService {
    client: BackendClient,
}

impl HttpOrdersService {
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    async fn submit_order(&self, order: &OrderDraft) -> Result<OrderAck, OrdersServiceError> {
        let ack: OrderAck = self.client.post_json(CLEAN_ORDER_PATH, order).await?;

        info!(
            order_id = order.order_id,
            lines = order.items.len(),
            status = %ack.status,
            "submitted order"
        );

        Ok(ack)
    }

    async fn submit_raw(&self, order: &Value) -> Result<OrderAck, OrdersServiceError> {
        let ack: OrderAck = self.client.post_json(CLEAN_ORDER_PATH, order).await?;

        info!(status = %ack.status, "forwarded order document");

        Ok(ack)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Submit a checkout draft to the order-acceptance endpoint.
    async fn submit_order(&self, order: &OrderDraft) -> Result<OrderAck, OrdersServiceError>;

    /// Forward an order document exactly as given.
    async fn submit_raw(&self, order: &Value) -> Result<OrderAck, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::{backend::BackendError, domain::orders::models::OrderLine, test::http::StubServer};

    fn draft() -> TestResult<OrderDraft> {
        Ok(OrderDraft {
            order_id: 42,
            customer_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            price: Decimal::from(998),
            is_priority: true,
            items: vec![OrderLine {
                sku: "CS-001".into(),
                item_name: "Customer Support Auto-Responder".to_string(),
                quantity: NonZeroU32::new(2).ok_or("zero quantity")?,
                price: Decimal::from(499),
                image_url: "https://images.example.test/CS-001.svg".to_string(),
            }],
        })
    }

    #[tokio::test]
    async fn draft_is_posted_to_clean_order() -> TestResult {
        let server =
            StubServer::respond(200, r#"{"status":"success","message":"Order 42 saved."}"#).await?;

        let ack = HttpOrdersService::new(server.client())
            .submit_order(&draft()?)
            .await?;

        let request = server.request().await?;

        assert!(ack.is_success());
        assert_eq!(ack.message, "Order 42 saved.");
        assert!(request.starts_with("POST /clean-order HTTP/1.1"), "got {request}");
        assert!(request.contains(r#""order_id":42"#), "got {request}");
        assert!(request.contains(r#""is_priority":true"#), "got {request}");

        Ok(())
    }

    #[tokio::test]
    async fn raw_document_is_forwarded_verbatim() -> TestResult {
        let server = StubServer::respond(200, r#"{"status":"success"}"#).await?;
        let document = serde_json::json!({"customer_name": "Bob", "items": [{"sku": "SL-001"}]});

        let ack = HttpOrdersService::new(server.client())
            .submit_raw(&document)
            .await?;

        let request = server.request().await?;

        assert!(ack.is_success());
        assert!(request.ends_with(&document.to_string()), "got {request}");

        Ok(())
    }

    #[tokio::test]
    async fn server_error_surfaces_as_backend_error() -> TestResult {
        let server = StubServer::respond(500, r#"{"detail":"database unavailable"}"#).await?;

        let result = HttpOrdersService::new(server.client())
            .submit_order(&draft()?)
            .await;

        assert!(
            matches!(
                &result,
                Err(OrdersServiceError::Backend(BackendError::UnexpectedResponse(message)))
                    if message.contains("500")
            ),
            "got {result:?}"
        );

        Ok(())
    }
}
